//! A governed wallet instance.
//!
//! Owner registry, treasury, and the signature entry points of one unit.
//! Every write returns the [`GovernanceEvent`] it produced; the host is
//! responsible for recording it.
//!
//! Direct and signed calls share one implementation per operation. The
//! signed entry points only add verification in front of it and replace
//! the caller with the recovered signer.

use govwallet_dispatch::{
    Authorized, CallKind, authorize_add_owner, authorize_remove_owner,
    authorize_send_native_token,
};
use govwallet_governance::{ExternalLedger, OwnerRegistry, Treasury, ValueSink};
use govwallet_types::{Address, Amount, AuthRoute, GovernanceEvent, Result, SignedCommand};

#[derive(Debug, Clone)]
pub struct Wallet {
    address: Address,
    owners: OwnerRegistry,
    treasury: Treasury,
    /// The external token ledger this wallet reports holdings on.
    external_ledger: Address,
}

impl Wallet {
    /// A wallet with `seed_owner` as its sole owner and nothing in it.
    ///
    /// # Errors
    /// `ZeroAddress` if `seed_owner` is zero.
    pub fn new(address: Address, seed_owner: Address, external_ledger: Address) -> Result<Self> {
        Ok(Self {
            address,
            owners: OwnerRegistry::new(seed_owner)?,
            treasury: Treasury::new(),
            external_ledger,
        })
    }

    // =================================================================
    // Reads
    // =================================================================

    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    #[must_use]
    pub fn external_ledger(&self) -> Address {
        self.external_ledger
    }

    #[must_use]
    pub fn is_owner(&self, identity: &Address) -> bool {
        self.owners.is_owner(identity)
    }

    #[must_use]
    pub fn owners(&self) -> Vec<Address> {
        self.owners.owners()
    }

    #[must_use]
    pub fn owner_registry(&self) -> &OwnerRegistry {
        &self.owners
    }

    #[must_use]
    pub fn balance(&self) -> Amount {
        self.treasury.balance()
    }

    /// This wallet's holdings on `ledger`.
    pub fn external_ledger_balance(&self, ledger: &dyn ExternalLedger) -> Result<Amount> {
        self.treasury.external_ledger_balance(ledger, &self.address)
    }

    // =================================================================
    // Deposits
    // =================================================================

    /// Accept native value from anyone.
    pub fn receive(&mut self, from: Address, amount: Amount) -> Result<GovernanceEvent> {
        let balance = self.treasury.receive(amount)?;
        tracing::debug!(wallet = %self.address, from = %from, amount, balance, "Deposit received");
        Ok(GovernanceEvent::Deposited { from, amount })
    }

    // =================================================================
    // Direct governed calls
    // =================================================================

    pub fn add_owner(&mut self, caller: &Address, owner: Address) -> Result<GovernanceEvent> {
        self.add_owner_as(caller, owner, AuthRoute::Direct)
    }

    pub fn remove_owner(&mut self, caller: &Address, owner: Address) -> Result<GovernanceEvent> {
        self.remove_owner_as(caller, owner, AuthRoute::Direct)
    }

    /// Send native value. `sink` performs the credit on the recipient side
    /// after this wallet has been debited.
    pub fn send_native_token(
        &mut self,
        caller: &Address,
        to: Address,
        amount: Amount,
        sink: &mut dyn ValueSink,
    ) -> Result<GovernanceEvent> {
        self.send_native_token_as(caller, to, amount, sink, AuthRoute::Direct)
    }

    // =================================================================
    // Signed governed calls
    // =================================================================

    pub fn add_owner_with_signature(&mut self, command: &SignedCommand) -> Result<GovernanceEvent> {
        let Authorized {
            signer,
            params: owner,
        } = authorize_add_owner(command, &self.owners)?;
        self.trace_verified(CallKind::AddOwner, &signer);
        self.add_owner_as(&signer, owner, AuthRoute::Signature)
    }

    pub fn remove_owner_with_signature(
        &mut self,
        command: &SignedCommand,
    ) -> Result<GovernanceEvent> {
        let Authorized {
            signer,
            params: owner,
        } = authorize_remove_owner(command, &self.owners)?;
        self.trace_verified(CallKind::RemoveOwner, &signer);
        self.remove_owner_as(&signer, owner, AuthRoute::Signature)
    }

    pub fn send_native_token_with_signature(
        &mut self,
        command: &SignedCommand,
        sink: &mut dyn ValueSink,
    ) -> Result<GovernanceEvent> {
        let Authorized {
            signer,
            params: (to, amount),
        } = authorize_send_native_token(command, &self.owners)?;
        self.trace_verified(CallKind::SendNativeToken, &signer);
        self.send_native_token_as(&signer, to, amount, sink, AuthRoute::Signature)
    }

    // =================================================================
    // Internals
    // =================================================================

    fn trace_verified(&self, entry: CallKind, signer: &Address) {
        tracing::debug!(
            wallet = %self.address,
            entry = %entry,
            signer = %signer,
            "Signed command verified"
        );
    }

    fn add_owner_as(
        &mut self,
        caller: &Address,
        owner: Address,
        route: AuthRoute,
    ) -> Result<GovernanceEvent> {
        self.owners.add_owner(caller, owner)?;
        Ok(GovernanceEvent::OwnerAdded {
            owner,
            by: *caller,
            route,
        })
    }

    fn remove_owner_as(
        &mut self,
        caller: &Address,
        owner: Address,
        route: AuthRoute,
    ) -> Result<GovernanceEvent> {
        self.owners.remove_owner(caller, owner)?;
        Ok(GovernanceEvent::OwnerRemoved {
            owner,
            by: *caller,
            route,
        })
    }

    fn send_native_token_as(
        &mut self,
        caller: &Address,
        to: Address,
        amount: Amount,
        sink: &mut dyn ValueSink,
        route: AuthRoute,
    ) -> Result<GovernanceEvent> {
        self.treasury
            .send_native_token(&self.owners, caller, to, amount, sink)?;
        Ok(GovernanceEvent::NativeTokenSent {
            to,
            amount,
            by: *caller,
            route,
        })
    }
}
