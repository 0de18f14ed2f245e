//! Wallet factory.
//!
//! A factory is a governed wallet in its own right, plus a creation
//! registry. Creating a wallet hands back an independent [`Wallet`]; the
//! factory keeps only its address and never touches it again.
//!
//! Indices are 1-based: the first wallet created is `wallet(1)` and
//! `wallet_index()` equals the number of wallets created so far.

use std::collections::BTreeMap;

use govwallet_types::{Address, GovernanceEvent, Result, WalletError};

use crate::address::derive_address;
use crate::wallet::Wallet;

#[derive(Debug, Clone)]
pub struct WalletFactory {
    wallet: Wallet,
    /// `index → wallet address`, for every index in `1..=wallet_index`.
    wallets: BTreeMap<u64, Address>,
    wallet_index: u64,
}

impl WalletFactory {
    /// A factory at `address`, owned by `deployer`.
    pub fn new(address: Address, deployer: Address, external_ledger: Address) -> Result<Self> {
        Ok(Self {
            wallet: Wallet::new(address, deployer, external_ledger)?,
            wallets: BTreeMap::new(),
            wallet_index: 0,
        })
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    /// The factory's own governed surface: owners, treasury, signed calls.
    #[must_use]
    pub fn as_wallet(&self) -> &Wallet {
        &self.wallet
    }

    pub fn as_wallet_mut(&mut self) -> &mut Wallet {
        &mut self.wallet
    }

    /// Number of wallets created so far.
    #[must_use]
    pub fn wallet_index(&self) -> u64 {
        self.wallet_index
    }

    /// Address of the wallet created at `index`. `None` for index 0 and for
    /// indices not yet reached.
    #[must_use]
    pub fn wallet(&self, index: u64) -> Option<Address> {
        self.wallets.get(&index).copied()
    }

    /// `(index, address)` pairs in creation order.
    pub fn wallets(&self) -> impl Iterator<Item = (u64, Address)> + '_ {
        self.wallets.iter().map(|(index, address)| (*index, *address))
    }

    /// Address the next created wallet will receive.
    #[must_use]
    pub fn next_wallet_address(&self) -> Address {
        derive_address(&self.address(), self.wallet_index.saturating_add(1))
    }

    /// Create a wallet owned solely by `seed_owner`.
    ///
    /// # Errors
    /// `OnlyOwner` if `caller` does not own the factory, `ZeroAddress` if
    /// `seed_owner` is zero.
    pub fn create_wallet(
        &mut self,
        caller: &Address,
        seed_owner: Address,
    ) -> Result<(Wallet, GovernanceEvent)> {
        let created = self.prepare_wallet(caller, seed_owner)?;
        let event = self.commit_wallet(caller, seed_owner, &created);
        Ok((created, event))
    }

    /// Run every check of [`create_wallet`](Self::create_wallet) and build
    /// the next wallet without registering it.
    pub(crate) fn prepare_wallet(&self, caller: &Address, seed_owner: Address) -> Result<Wallet> {
        self.wallet.owner_registry().ensure_owner(caller)?;
        if seed_owner.is_zero() {
            return Err(WalletError::ZeroAddress);
        }
        let index = self
            .wallet_index
            .checked_add(1)
            .ok_or_else(|| WalletError::Internal("wallet index exhausted".into()))?;
        let address = derive_address(&self.address(), index);
        Wallet::new(address, seed_owner, self.wallet.external_ledger())
    }

    /// Register a wallet built by [`prepare_wallet`](Self::prepare_wallet)
    /// under the next index.
    pub(crate) fn commit_wallet(
        &mut self,
        caller: &Address,
        seed_owner: Address,
        created: &Wallet,
    ) -> GovernanceEvent {
        self.wallet_index += 1;
        let index = self.wallet_index;
        let address = created.address();
        debug_assert_eq!(address, derive_address(&self.address(), index));
        self.wallets.insert(index, address);

        tracing::info!(
            factory = %self.address(),
            index,
            wallet = %address,
            seed_owner = %seed_owner,
            by = %caller,
            "Wallet created"
        );
        GovernanceEvent::WalletCreated {
            index,
            wallet: address,
            seed_owner,
            by: *caller,
        }
    }
}
