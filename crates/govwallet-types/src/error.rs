//! Error types for govwallet.
//!
//! All errors use the `WF_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Owner governance errors
//! - 2xx: Treasury errors
//! - 3xx: Signature dispatch errors
//! - 4xx: Factory / host errors
//! - 9xx: General / internal errors
//!
//! Every variant maps to a fixed reason name via [`WalletError::reason`];
//! that name is the observable failure signal callers match on.

use thiserror::Error;

use crate::{Address, Amount, Selector};

/// Central error enum for all govwallet operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    // =================================================================
    // Owner Governance Errors (1xx)
    // =================================================================
    /// The caller (or recovered signer, for direct calls) is not an owner.
    #[error("WF_ERR_100: OnlyOwner: {caller} is not an owner")]
    OnlyOwner { caller: Address },

    /// The zero identity was supplied where a real identity is required.
    #[error("WF_ERR_101: ZeroAddress: the zero identity is reserved")]
    ZeroAddress,

    /// The identity is already in the owner set.
    #[error("WF_ERR_102: OwnerExists: {0} is already an owner")]
    OwnerExists(Address),

    /// The identity is not in the owner set.
    #[error("WF_ERR_103: NotAnOwner: {0} is not an owner")]
    NotAnOwner(Address),

    // =================================================================
    // Treasury Errors (2xx)
    // =================================================================
    /// Not enough native value held to cover the transfer.
    #[error("WF_ERR_200: InsufficientBalance: need {needed}, have {available}")]
    InsufficientBalance { needed: Amount, available: Amount },

    /// A deposit would overflow the balance counter.
    #[error("WF_ERR_201: BalanceOverflow: deposit of {amount} overflows balance")]
    BalanceOverflow { amount: Amount },

    /// The external ledger query failed.
    #[error("WF_ERR_202: ExternalLedger: {0}")]
    ExternalLedger(String),

    // =================================================================
    // Signature Dispatch Errors (3xx)
    // =================================================================
    /// The encoded call targets a different operation than the entry point.
    #[error("WF_ERR_300: WrongSelector: expected {expected}, got {actual}")]
    WrongSelector { expected: Selector, actual: Selector },

    /// The recovered signer is not a current owner.
    #[error("WF_ERR_301: InvalidSigner: {signer} is not an owner")]
    InvalidSigner { signer: Address },

    /// The signature is malformed or no public key can be recovered from it.
    #[error("WF_ERR_302: InvalidSignature: {reason}")]
    InvalidSignature { reason: String },

    /// The encoded call could not be decoded into typed parameters.
    #[error("WF_ERR_303: MalformedCall: {reason}")]
    MalformedCall { reason: String },

    // =================================================================
    // Factory / Host Errors (4xx)
    // =================================================================
    /// No wallet or factory is deployed at this address.
    #[error("WF_ERR_400: UnknownUnit: nothing deployed at {0}")]
    UnknownUnit(Address),

    /// The unit exists but is not a factory.
    #[error("WF_ERR_401: NotAFactory: {0} cannot create wallets")]
    NotAFactory(Address),

    /// An externally owned account tried to move more value than it holds.
    #[error("WF_ERR_402: InsufficientFunds: {account} needs {needed}, has {available}")]
    InsufficientFunds {
        account: Address,
        needed: Amount,
        available: Amount,
    },

    /// A wallet or factory is already deployed at this address.
    #[error("WF_ERR_403: AddressOccupied: a unit is already deployed at {0}")]
    AddressOccupied(Address),

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("WF_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("WF_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config file, missing fields, etc.).
    #[error("WF_ERR_902: Configuration error: {0}")]
    Configuration(String),
}

impl WalletError {
    /// The fixed reason name for this failure (e.g. `"OnlyOwner"`).
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::OnlyOwner { .. } => "OnlyOwner",
            Self::ZeroAddress => "ZeroAddress",
            Self::OwnerExists(_) => "OwnerExists",
            Self::NotAnOwner(_) => "NotAnOwner",
            Self::InsufficientBalance { .. } => "InsufficientBalance",
            Self::BalanceOverflow { .. } => "BalanceOverflow",
            Self::ExternalLedger(_) => "ExternalLedger",
            Self::WrongSelector { .. } => "WrongSelector",
            Self::InvalidSigner { .. } => "InvalidSigner",
            Self::InvalidSignature { .. } => "InvalidSignature",
            Self::MalformedCall { .. } => "MalformedCall",
            Self::UnknownUnit(_) => "UnknownUnit",
            Self::NotAFactory(_) => "NotAFactory",
            Self::InsufficientFunds { .. } => "InsufficientFunds",
            Self::AddressOccupied(_) => "AddressOccupied",
            Self::Internal(_) => "Internal",
            Self::Serialization(_) => "Serialization",
            Self::Configuration(_) => "Configuration",
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, WalletError>;

impl From<serde_json::Error> for WalletError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
