//! In-memory fungible-token ledger.
//!
//! Stands in for the external token contract every wallet can query. Only
//! `balance_of` is visible to wallets; minting and transfers are driven by
//! the host or by tests.

use std::collections::HashMap;

use govwallet_governance::ExternalLedger;
use govwallet_types::{Address, Amount, LedgerConfig, Result, WalletError};

#[derive(Debug, Clone)]
pub struct TokenLedger {
    address: Address,
    symbol: String,
    decimals: u8,
    balances: HashMap<Address, Amount>,
    total_supply: Amount,
}

impl TokenLedger {
    /// An empty ledger described by `config`.
    #[must_use]
    pub fn new(config: &LedgerConfig) -> Self {
        Self {
            address: config.address,
            symbol: config.symbol.clone(),
            decimals: config.decimals,
            balances: HashMap::new(),
            total_supply: 0,
        }
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    #[must_use]
    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    #[must_use]
    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Create `amount` new tokens for `to`.
    ///
    /// # Errors
    /// `ZeroAddress` for a zero recipient, `BalanceOverflow` if the supply
    /// would overflow.
    pub fn mint(&mut self, to: Address, amount: Amount) -> Result<()> {
        if to.is_zero() {
            return Err(WalletError::ZeroAddress);
        }
        let supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(WalletError::BalanceOverflow { amount })?;
        // Every balance is bounded by the supply, so this cannot overflow.
        *self.balances.entry(to).or_default() += amount;
        self.total_supply = supply;

        tracing::debug!(
            token = %self.symbol,
            to = %to,
            amount,
            supply = self.total_supply,
            "Tokens minted"
        );
        Ok(())
    }

    /// Move tokens between holders.
    ///
    /// # Errors
    /// `ZeroAddress` for a zero recipient, `InsufficientFunds` if `from`
    /// holds less than `amount`.
    pub fn transfer(&mut self, from: Address, to: Address, amount: Amount) -> Result<()> {
        if to.is_zero() {
            return Err(WalletError::ZeroAddress);
        }
        let available = self.balances.get(&from).copied().unwrap_or_default();
        if available < amount {
            return Err(WalletError::InsufficientFunds {
                account: from,
                needed: amount,
                available,
            });
        }
        self.balances.insert(from, available - amount);
        *self.balances.entry(to).or_default() += amount;
        Ok(())
    }
}

impl ExternalLedger for TokenLedger {
    fn balance_of(&self, holder: &Address) -> Result<Amount> {
        Ok(self.balances.get(holder).copied().unwrap_or_default())
    }
}
