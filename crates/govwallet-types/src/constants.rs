//! System-wide constants for govwallet.

/// Canonical signature of the direct add-owner operation.
pub const ADD_OWNER_SIGNATURE: &str = "addOwner(address)";

/// Canonical signature of the direct remove-owner operation.
pub const REMOVE_OWNER_SIGNATURE: &str = "removeOwner(address)";

/// Canonical signature of the direct native transfer operation.
pub const SEND_NATIVE_TOKEN_SIGNATURE: &str = "sendNativeToken(address,uint256)";

/// Prefix framing a 32-byte digest before signing (EIP-191, version `E`).
/// Keeps a signed command from ever being valid as a raw transaction.
pub const SIGNED_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

/// Width of one ABI word.
pub const ABI_WORD_LEN: usize = 32;

/// Width of a call selector.
pub const SELECTOR_LEN: usize = 4;

/// Default chain identifier for the in-process host.
pub const DEFAULT_CHAIN_ID: u64 = 31_337;

/// Default native currency symbol.
pub const DEFAULT_NATIVE_SYMBOL: &str = "ETH";

/// Default native currency decimals.
pub const DEFAULT_NATIVE_DECIMALS: u8 = 18;

/// Default external ledger symbol.
pub const DEFAULT_LEDGER_SYMBOL: &str = "USDC";

/// Default external ledger decimals.
pub const DEFAULT_LEDGER_DECIMALS: u8 = 6;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "govwallet";
