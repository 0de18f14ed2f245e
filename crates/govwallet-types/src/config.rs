//! Configuration types for the wallet host and its external ledger.

use serde::{Deserialize, Serialize};

use crate::{Address, Result, WalletError, constants};

/// Default external ledger address (USDC on Ethereum mainnet).
pub const DEFAULT_LEDGER_ADDRESS: Address = Address([
    0xa0, 0xb8, 0x69, 0x91, 0xc6, 0x21, 0x8b, 0x36, 0xc1, 0xd1, 0x9d, 0x4a, 0x2e, 0x9e, 0xb0,
    0xce, 0x36, 0x06, 0xeb, 0x48,
]);

/// Configuration for an in-process ledger host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Chain identifier, reported in logs.
    pub chain_id: u64,
    /// Symbol of the native value unit (e.g. "ETH").
    pub native_symbol: String,
    /// Decimals of the native value unit.
    pub native_decimals: u8,
    /// The external fungible-token ledger every wallet can query.
    pub external_ledger: LedgerConfig,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            chain_id: constants::DEFAULT_CHAIN_ID,
            native_symbol: constants::DEFAULT_NATIVE_SYMBOL.to_string(),
            native_decimals: constants::DEFAULT_NATIVE_DECIMALS,
            external_ledger: LedgerConfig::default(),
        }
    }
}

impl ChainConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| WalletError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the host cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.native_symbol.trim().is_empty() {
            return Err(WalletError::Configuration(
                "native_symbol must not be empty".to_string(),
            ));
        }
        self.external_ledger.validate()
    }
}

/// External fungible-token ledger configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Address the ledger is reachable at.
    pub address: Address,
    /// Token symbol (e.g. "USDC").
    pub symbol: String,
    /// Token decimals.
    pub decimals: u8,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_LEDGER_ADDRESS,
            symbol: constants::DEFAULT_LEDGER_SYMBOL.to_string(),
            decimals: constants::DEFAULT_LEDGER_DECIMALS,
        }
    }
}

impl LedgerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.address.is_zero() {
            return Err(WalletError::Configuration(
                "external_ledger.address must not be the zero address".to_string(),
            ));
        }
        if self.symbol.trim().is_empty() {
            return Err(WalletError::Configuration(
                "external_ledger.symbol must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
