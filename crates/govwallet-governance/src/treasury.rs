//! Treasury: native value held by one governed unit.
//!
//! Deposits are ungated. Outbound transfers are owner-gated and debit the
//! balance **before** the value leaves: the [`ValueSink`] that performs the
//! external effect always observes the post-debit balance, so a re-entrant
//! second transfer can never spend funds that are already on their way out.
//! If the sink fails, the debit is rolled back and the sink's error returned.

use govwallet_types::{Address, Amount, Result, WalletError};

use crate::owners::OwnerRegistry;

/// A transfer that has already been debited and is being delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutboundTransfer {
    pub to: Address,
    pub amount: Amount,
    /// Sender balance after the debit, as any re-entrant read observes it.
    pub balance_after: Amount,
}

/// The external effect of a native transfer: crediting the recipient.
pub trait ValueSink {
    /// Deliver `transfer.amount` to `transfer.to`.
    ///
    /// # Errors
    /// Any error aborts the transfer; the sender's debit is reverted.
    fn deliver(&mut self, transfer: &OutboundTransfer) -> Result<()>;
}

impl<F> ValueSink for F
where
    F: FnMut(&OutboundTransfer) -> Result<()>,
{
    fn deliver(&mut self, transfer: &OutboundTransfer) -> Result<()> {
        self(transfer)
    }
}

/// Read-only capability over an external fungible-token ledger.
pub trait ExternalLedger {
    /// Holdings of `holder` on this ledger.
    fn balance_of(&self, holder: &Address) -> Result<Amount>;
}

/// Native balance of one wallet or factory.
#[derive(Debug, Clone, Default)]
pub struct Treasury {
    balance: Amount,
}

impl Treasury {
    /// A treasury holding nothing.
    #[must_use]
    pub fn new() -> Self {
        Self { balance: 0 }
    }

    #[must_use]
    pub fn balance(&self) -> Amount {
        self.balance
    }

    /// Inbound transfer. Open to anyone.
    ///
    /// # Errors
    /// Returns `BalanceOverflow` if the balance would exceed `u128::MAX`.
    pub fn receive(&mut self, amount: Amount) -> Result<Amount> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(WalletError::BalanceOverflow { amount })?;
        Ok(self.balance)
    }

    /// Owner-gated outbound transfer.
    ///
    /// 1. `caller` must be an owner
    /// 2. `to` must not be the zero identity
    /// 3. `amount` must not exceed the balance
    /// 4. Debit, then hand the value to `sink`
    ///
    /// # Errors
    /// `OnlyOwner`, `ZeroAddress`, `InsufficientBalance`, or whatever the
    /// sink returns (in which case the balance is restored).
    pub fn send_native_token(
        &mut self,
        owners: &OwnerRegistry,
        caller: &Address,
        to: Address,
        amount: Amount,
        sink: &mut dyn ValueSink,
    ) -> Result<()> {
        owners.ensure_owner(caller)?;
        if to.is_zero() {
            return Err(WalletError::ZeroAddress);
        }
        if amount > self.balance {
            return Err(WalletError::InsufficientBalance {
                needed: amount,
                available: self.balance,
            });
        }

        // Debit first. The sink only ever sees the reduced balance.
        self.balance -= amount;
        let transfer = OutboundTransfer {
            to,
            amount,
            balance_after: self.balance,
        };

        if let Err(err) = sink.deliver(&transfer) {
            self.balance += amount;
            tracing::warn!(
                to = %to,
                amount,
                error = %err,
                "Native transfer delivery failed, debit reverted"
            );
            return Err(err);
        }

        tracing::info!(
            to = %to,
            amount,
            by = %caller,
            balance = self.balance,
            "Native token sent"
        );
        Ok(())
    }

    /// Pass-through balance query on an external ledger for `holder`
    /// (the unit's own address). Ledger failures are surfaced unchanged.
    pub fn external_ledger_balance(
        &self,
        ledger: &dyn ExternalLedger,
        holder: &Address,
    ) -> Result<Amount> {
        ledger.balance_of(holder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(balance: Amount) -> (Treasury, OwnerRegistry, Address) {
        let owner = Address::random();
        let mut treasury = Treasury::new();
        treasury.receive(balance).unwrap();
        (treasury, OwnerRegistry::new(owner).unwrap(), owner)
    }

    fn accept(_: &OutboundTransfer) -> Result<()> {
        Ok(())
    }

    #[test]
    fn new_treasury_is_empty() {
        assert_eq!(Treasury::new().balance(), 0);
    }

    #[test]
    fn receive_accumulates() {
        let mut t = Treasury::new();
        t.receive(1).unwrap();
        assert_eq!(t.receive(2).unwrap(), 3);
        assert_eq!(t.balance(), 3);
    }

    #[test]
    fn receive_overflow_rejected_without_change() {
        let mut t = Treasury::new();
        t.receive(Amount::MAX).unwrap();
        let err = t.receive(1).unwrap_err();
        assert_eq!(err, WalletError::BalanceOverflow { amount: 1 });
        assert_eq!(t.balance(), Amount::MAX);
    }

    #[test]
    fn send_deducts_exact_amount() {
        let (mut t, owners, owner) = setup(1_000);
        let mut delivered = Vec::new();
        let mut sink = |tr: &OutboundTransfer| -> Result<()> {
            delivered.push(*tr);
            Ok(())
        };
        let to = Address::random();
        t.send_native_token(&owners, &owner, to, 400, &mut sink)
            .unwrap();
        assert_eq!(t.balance(), 600);
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].to, to);
        assert_eq!(delivered[0].amount, 400);
    }

    #[test]
    fn send_entire_balance() {
        let (mut t, owners, owner) = setup(1);
        t.send_native_token(&owners, &owner, owner, 1, &mut accept)
            .unwrap();
        assert_eq!(t.balance(), 0);
    }

    #[test]
    fn insufficient_balance_leaves_state_unchanged() {
        let (mut t, owners, owner) = setup(1);
        let err = t
            .send_native_token(&owners, &owner, owner, 2, &mut accept)
            .unwrap_err();
        assert_eq!(
            err,
            WalletError::InsufficientBalance {
                needed: 2,
                available: 1
            }
        );
        assert_eq!(t.balance(), 1);
    }

    #[test]
    fn non_owner_cannot_send() {
        let (mut t, owners, _) = setup(10);
        let outsider = Address::random();
        let err = t
            .send_native_token(&owners, &outsider, outsider, 1, &mut accept)
            .unwrap_err();
        assert_eq!(err.reason(), "OnlyOwner");
        assert_eq!(t.balance(), 10);
    }

    #[test]
    fn zero_recipient_rejected_before_balance_check() {
        let (mut t, owners, owner) = setup(0);
        let err = t
            .send_native_token(&owners, &owner, Address::ZERO, 5, &mut accept)
            .unwrap_err();
        assert_eq!(err, WalletError::ZeroAddress);
    }

    #[test]
    fn sink_observes_debited_balance() {
        let (mut t, owners, owner) = setup(100);
        let mut observed = None;
        let mut sink = |tr: &OutboundTransfer| -> Result<()> {
            observed = Some(tr.balance_after);
            Ok(())
        };
        t.send_native_token(&owners, &owner, Address::random(), 70, &mut sink)
            .unwrap();
        assert_eq!(observed, Some(30));
    }

    #[test]
    fn failed_delivery_reverts_debit() {
        let (mut t, owners, owner) = setup(100);
        let mut sink = |_: &OutboundTransfer| -> Result<()> {
            Err(WalletError::Internal("recipient rejected".into()))
        };
        let err = t
            .send_native_token(&owners, &owner, Address::random(), 70, &mut sink)
            .unwrap_err();
        assert!(matches!(err, WalletError::Internal(_)));
        assert_eq!(t.balance(), 100);
    }

    struct FixedLedger(Amount);

    impl ExternalLedger for FixedLedger {
        fn balance_of(&self, _holder: &Address) -> Result<Amount> {
            Ok(self.0)
        }
    }

    struct BrokenLedger;

    impl ExternalLedger for BrokenLedger {
        fn balance_of(&self, _holder: &Address) -> Result<Amount> {
            Err(WalletError::ExternalLedger("rpc unavailable".into()))
        }
    }

    #[test]
    fn external_ledger_balance_passes_through() {
        let t = Treasury::new();
        let holder = Address::random();
        assert_eq!(t.external_ledger_balance(&FixedLedger(42), &holder), Ok(42));
    }

    #[test]
    fn external_ledger_failure_is_surfaced() {
        let t = Treasury::new();
        let err = t
            .external_ledger_balance(&BrokenLedger, &Address::random())
            .unwrap_err();
        assert_eq!(err.reason(), "ExternalLedger");
    }
}
