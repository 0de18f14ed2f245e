//! In-process ledger host.
//!
//! Holds externally owned account (EOA) balances, every deployed wallet and
//! factory, the external token ledger, and the governance event log.
//!
//! Operations are fully serialized. The unit executing an operation is
//! detached from the unit table while it runs and reinserted afterwards,
//! so value it sends can land in any other unit without aliasing, and no
//! operation ever observes another's partial state. Every operation either
//! applies completely or fails with no effect.

use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use govwallet_governance::{OutboundTransfer, ValueSink};
use govwallet_types::{
    Address, Amount, ChainConfig, EventRecord, GovernanceEvent, Result, SignedCommand,
    WalletError, constants,
};

use crate::address::derive_address;
use crate::factory::WalletFactory;
use crate::ledger::TokenLedger;
use crate::wallet::Wallet;

/// A deployed governed unit.
#[derive(Debug, Clone)]
pub enum Unit {
    Wallet(Wallet),
    Factory(WalletFactory),
}

impl Unit {
    /// The governed surface shared by both kinds of unit.
    #[must_use]
    pub fn as_wallet(&self) -> &Wallet {
        match self {
            Self::Wallet(wallet) => wallet,
            Self::Factory(factory) => factory.as_wallet(),
        }
    }

    fn as_wallet_mut(&mut self) -> &mut Wallet {
        match self {
            Self::Wallet(wallet) => wallet,
            Self::Factory(factory) => factory.as_wallet_mut(),
        }
    }

    #[must_use]
    pub fn as_factory(&self) -> Option<&WalletFactory> {
        match self {
            Self::Factory(factory) => Some(factory),
            Self::Wallet(_) => None,
        }
    }

    #[must_use]
    pub fn is_factory(&self) -> bool {
        matches!(self, Self::Factory(_))
    }
}

/// Credits value leaving the executing unit.
struct HostSink<'a> {
    sender: Address,
    accounts: &'a mut HashMap<Address, Amount>,
    units: &'a mut BTreeMap<Address, Unit>,
    /// Value sent by the executing unit to itself, applied on reinsertion.
    self_credit: Amount,
    /// Deposit events raised on recipient units.
    credited: Vec<(Address, GovernanceEvent)>,
}

impl ValueSink for HostSink<'_> {
    fn deliver(&mut self, transfer: &OutboundTransfer) -> Result<()> {
        if transfer.to == self.sender {
            self.self_credit = self
                .self_credit
                .checked_add(transfer.amount)
                .ok_or(WalletError::BalanceOverflow {
                    amount: transfer.amount,
                })?;
            return Ok(());
        }
        if let Some(unit) = self.units.get_mut(&transfer.to) {
            let event = unit.as_wallet_mut().receive(self.sender, transfer.amount)?;
            self.credited.push((transfer.to, event));
            return Ok(());
        }
        if transfer.amount == 0 {
            return Ok(());
        }
        let balance = self.accounts.entry(transfer.to).or_default();
        *balance = balance
            .checked_add(transfer.amount)
            .ok_or(WalletError::BalanceOverflow {
                amount: transfer.amount,
            })?;
        Ok(())
    }
}

#[derive(Debug)]
pub struct Chain {
    config: ChainConfig,
    /// EOA native balances.
    accounts: HashMap<Address, Amount>,
    /// Per-deployer creation nonces for top-level deployments.
    nonces: HashMap<Address, u64>,
    units: BTreeMap<Address, Unit>,
    ledger: TokenLedger,
    events: Vec<EventRecord>,
}

impl Default for Chain {
    fn default() -> Self {
        let config = ChainConfig::default();
        let ledger = TokenLedger::new(&config.external_ledger);
        Self {
            config,
            accounts: HashMap::new(),
            nonces: HashMap::new(),
            units: BTreeMap::new(),
            ledger,
            events: Vec::new(),
        }
    }
}

impl Chain {
    /// A host running with `config`.
    ///
    /// # Errors
    /// `Configuration` if the config does not validate.
    pub fn new(config: ChainConfig) -> Result<Self> {
        config.validate()?;
        tracing::info!(
            engine = constants::ENGINE_NAME,
            version = constants::VERSION,
            chain_id = config.chain_id,
            native = %config.native_symbol,
            ledger = %config.external_ledger.address,
            token = %config.external_ledger.symbol,
            "Chain host started"
        );
        Ok(Self {
            ledger: TokenLedger::new(&config.external_ledger),
            config,
            ..Self::default()
        })
    }

    #[must_use]
    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    #[must_use]
    pub fn ledger(&self) -> &TokenLedger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut TokenLedger {
        &mut self.ledger
    }

    // =================================================================
    // Accounts
    // =================================================================

    /// Credit an EOA with freshly issued native value.
    pub fn fund(&mut self, account: Address, amount: Amount) -> Result<Amount> {
        if self.units.contains_key(&account) {
            return Err(WalletError::AddressOccupied(account));
        }
        let balance = self.accounts.entry(account).or_default();
        *balance = balance
            .checked_add(amount)
            .ok_or(WalletError::BalanceOverflow { amount })?;
        Ok(*balance)
    }

    /// Native balance of any address: an EOA or a deployed unit.
    #[must_use]
    pub fn native_balance(&self, address: &Address) -> Amount {
        match self.units.get(address) {
            Some(unit) => unit.as_wallet().balance(),
            None => self.accounts.get(address).copied().unwrap_or_default(),
        }
    }

    /// Sum of every native balance on the host.
    #[must_use]
    pub fn total_native_supply(&self) -> Amount {
        self.accounts
            .values()
            .copied()
            .chain(self.units.values().map(|u| u.as_wallet().balance()))
            .fold(0, Amount::saturating_add)
    }

    // =================================================================
    // Deployment
    // =================================================================

    /// Deploy a standalone wallet owned by `seed_owner`.
    ///
    /// Native value already sent to the derived address becomes the new
    /// wallet's opening balance.
    pub fn deploy_wallet(&mut self, deployer: Address, seed_owner: Address) -> Result<Address> {
        let address = self.next_deploy_address(&deployer)?;
        let mut unit = Unit::Wallet(Wallet::new(address, seed_owner, self.ledger.address())?);
        let opening = self.take_over_account(&mut unit)?;
        self.commit_deploy(deployer, unit, opening);
        tracing::info!(wallet = %address, deployer = %deployer, seed_owner = %seed_owner, "Wallet deployed");
        Ok(address)
    }

    /// Deploy a factory owned by `deployer`.
    pub fn deploy_factory(&mut self, deployer: Address) -> Result<Address> {
        let address = self.next_deploy_address(&deployer)?;
        let mut unit = Unit::Factory(WalletFactory::new(address, deployer, self.ledger.address())?);
        let opening = self.take_over_account(&mut unit)?;
        self.commit_deploy(deployer, unit, opening);
        tracing::info!(factory = %address, deployer = %deployer, "Factory deployed");
        Ok(address)
    }

    fn next_deploy_address(&self, deployer: &Address) -> Result<Address> {
        let nonce = self.nonces.get(deployer).copied().unwrap_or_default();
        let address = derive_address(deployer, nonce);
        self.ensure_vacant(&address)?;
        Ok(address)
    }

    fn commit_deploy(&mut self, deployer: Address, unit: Unit, opening: Option<GovernanceEvent>) {
        *self.nonces.entry(deployer).or_default() += 1;
        self.install(unit, opening);
    }

    /// Only a deployed unit blocks an address. An account balance at the
    /// address is taken over by the unit instead.
    fn ensure_vacant(&self, address: &Address) -> Result<()> {
        if self.units.contains_key(address) {
            return Err(WalletError::AddressOccupied(*address));
        }
        Ok(())
    }

    /// Credit a not-yet-installed unit with the account balance held at its
    /// address. The account itself is closed by [`install`](Self::install).
    fn take_over_account(&self, unit: &mut Unit) -> Result<Option<GovernanceEvent>> {
        let address = unit.as_wallet().address();
        match self.accounts.get(&address).copied() {
            Some(balance) if balance > 0 => {
                let event = unit.as_wallet_mut().receive(address, balance)?;
                tracing::info!(unit = %address, amount = balance, "Pre-deployment balance taken over");
                Ok(Some(event))
            }
            _ => Ok(None),
        }
    }

    /// Place `unit` at its address, closing any account there.
    fn install(&mut self, unit: Unit, opening: Option<GovernanceEvent>) {
        let address = unit.as_wallet().address();
        self.accounts.remove(&address);
        self.units.insert(address, unit);
        if let Some(deposit) = opening {
            self.record(address, deposit);
        }
    }

    // =================================================================
    // Reads
    // =================================================================

    #[must_use]
    pub fn unit(&self, address: &Address) -> Option<&Unit> {
        self.units.get(address)
    }

    fn require(&self, address: &Address) -> Result<&Unit> {
        self.units
            .get(address)
            .ok_or(WalletError::UnknownUnit(*address))
    }

    fn require_factory(&self, address: &Address) -> Result<&WalletFactory> {
        self.require(address)?
            .as_factory()
            .ok_or(WalletError::NotAFactory(*address))
    }

    pub fn is_owner(&self, unit: &Address, identity: &Address) -> Result<bool> {
        Ok(self.require(unit)?.as_wallet().is_owner(identity))
    }

    pub fn owners(&self, unit: &Address) -> Result<Vec<Address>> {
        Ok(self.require(unit)?.as_wallet().owners())
    }

    pub fn balance(&self, unit: &Address) -> Result<Amount> {
        Ok(self.require(unit)?.as_wallet().balance())
    }

    /// The unit's holdings on the external token ledger.
    pub fn external_ledger_balance(&self, unit: &Address) -> Result<Amount> {
        let wallet = self.require(unit)?.as_wallet();
        if wallet.external_ledger() != self.ledger.address() {
            return Err(WalletError::ExternalLedger(format!(
                "no ledger deployed at {}",
                wallet.external_ledger()
            )));
        }
        wallet.external_ledger_balance(&self.ledger)
    }

    pub fn wallet_index(&self, factory: &Address) -> Result<u64> {
        Ok(self.require_factory(factory)?.wallet_index())
    }

    pub fn wallet_at(&self, factory: &Address, index: u64) -> Result<Option<Address>> {
        Ok(self.require_factory(factory)?.wallet(index))
    }

    // =================================================================
    // Deposits
    // =================================================================

    /// Move native value from an EOA into a unit.
    pub fn deposit(&mut self, from: Address, unit: Address, amount: Amount) -> Result<()> {
        let available = self.accounts.get(&from).copied().unwrap_or_default();
        if available < amount {
            return Err(WalletError::InsufficientFunds {
                account: from,
                needed: amount,
                available,
            });
        }
        let target = self
            .units
            .get_mut(&unit)
            .ok_or(WalletError::UnknownUnit(unit))?;
        let event = target.as_wallet_mut().receive(from, amount)?;
        match available - amount {
            0 => self.accounts.remove(&from),
            remaining => self.accounts.insert(from, remaining),
        };
        self.record(unit, event);
        Ok(())
    }

    // =================================================================
    // Governed calls
    // =================================================================

    pub fn add_owner(&mut self, unit: Address, caller: Address, owner: Address) -> Result<()> {
        self.execute(unit, |u, _| u.as_wallet_mut().add_owner(&caller, owner))
    }

    pub fn remove_owner(&mut self, unit: Address, caller: Address, owner: Address) -> Result<()> {
        self.execute(unit, |u, _| u.as_wallet_mut().remove_owner(&caller, owner))
    }

    pub fn send_native_token(
        &mut self,
        unit: Address,
        caller: Address,
        to: Address,
        amount: Amount,
    ) -> Result<()> {
        self.execute(unit, |u, sink| {
            u.as_wallet_mut()
                .send_native_token(&caller, to, amount, sink)
        })
    }

    /// Submit a signed `addOwner` command. The submitter is irrelevant.
    pub fn add_owner_with_signature(&mut self, unit: Address, command: &SignedCommand) -> Result<()> {
        self.execute(unit, |u, _| u.as_wallet_mut().add_owner_with_signature(command))
    }

    pub fn remove_owner_with_signature(
        &mut self,
        unit: Address,
        command: &SignedCommand,
    ) -> Result<()> {
        self.execute(unit, |u, _| {
            u.as_wallet_mut().remove_owner_with_signature(command)
        })
    }

    pub fn send_native_token_with_signature(
        &mut self,
        unit: Address,
        command: &SignedCommand,
    ) -> Result<()> {
        self.execute(unit, |u, sink| {
            u.as_wallet_mut()
                .send_native_token_with_signature(command, sink)
        })
    }

    /// Create a wallet through `factory` and deploy it on the host.
    ///
    /// The factory's own checks run first, so a caller error is reported as
    /// such whatever sits at the next address. Native value already sent to
    /// that address becomes the new wallet's opening balance.
    pub fn create_wallet(
        &mut self,
        factory: Address,
        caller: Address,
        seed_owner: Address,
    ) -> Result<Address> {
        let wallet = self
            .require_factory(&factory)?
            .prepare_wallet(&caller, seed_owner)?;
        let address = wallet.address();
        self.ensure_vacant(&address)?;
        let mut unit = Unit::Wallet(wallet);
        let opening = self.take_over_account(&mut unit)?;

        let event = match self.units.get_mut(&factory) {
            Some(Unit::Factory(f)) => f.commit_wallet(&caller, seed_owner, unit.as_wallet()),
            Some(Unit::Wallet(_)) => return Err(WalletError::NotAFactory(factory)),
            None => return Err(WalletError::UnknownUnit(factory)),
        };
        self.record(factory, event);
        self.install(unit, opening);
        Ok(address)
    }

    // =================================================================
    // Events
    // =================================================================

    #[must_use]
    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    /// Events recorded for one unit, oldest first.
    pub fn events_for(&self, unit: Address) -> impl Iterator<Item = &EventRecord> + '_ {
        self.events.iter().filter(move |record| record.unit == unit)
    }

    /// The full event log as a JSON array.
    pub fn export_events(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.events)?)
    }

    // =================================================================
    // Internals
    // =================================================================

    fn detach(&mut self, address: Address) -> Result<Unit> {
        self.units
            .remove(&address)
            .ok_or(WalletError::UnknownUnit(address))
    }

    /// Run `op` on a detached unit with a sink that credits the rest of the
    /// host. The unit is always reinserted; events are recorded only on
    /// success.
    fn execute<F>(&mut self, address: Address, op: F) -> Result<()>
    where
        F: FnOnce(&mut Unit, &mut HostSink<'_>) -> Result<GovernanceEvent>,
    {
        let mut unit = self.detach(address)?;
        let mut sink = HostSink {
            sender: address,
            accounts: &mut self.accounts,
            units: &mut self.units,
            self_credit: 0,
            credited: Vec::new(),
        };

        let outcome = op(&mut unit, &mut sink);
        let HostSink {
            self_credit,
            credited,
            ..
        } = sink;

        let outcome = outcome.and_then(|event| {
            if self_credit > 0 {
                let deposit = unit.as_wallet_mut().receive(address, self_credit)?;
                Ok((event, Some(deposit)))
            } else {
                Ok((event, None))
            }
        });
        self.units.insert(address, unit);

        let (event, self_deposit) = outcome?;
        self.record(address, event);
        for (recipient, deposit) in credited {
            self.record(recipient, deposit);
        }
        if let Some(deposit) = self_deposit {
            self.record(address, deposit);
        }
        Ok(())
    }

    fn record(&mut self, unit: Address, event: GovernanceEvent) {
        let sequence = self.events.len() as u64;
        tracing::debug!(sequence, unit = %unit, kind = event.kind(), "Event recorded");
        self.events.push(EventRecord {
            sequence,
            unit,
            event,
            recorded_at: Utc::now(),
        });
    }
}
