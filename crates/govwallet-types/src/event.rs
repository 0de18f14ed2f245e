//! Governance events for the audit trail.
//!
//! Every successful mutation of a wallet or factory produces one
//! [`GovernanceEvent`]. The host stamps it into an [`EventRecord`] and
//! appends it to an append-only log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Address, Amount};

/// How a governed operation was authorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthRoute {
    /// The owner called the operation directly.
    Direct,
    /// A signed command from the owner was submitted by anyone.
    Signature,
}

impl std::fmt::Display for AuthRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Direct => write!(f, "DIRECT"),
            Self::Signature => write!(f, "SIGNATURE"),
        }
    }
}

/// A state change applied to one governed unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GovernanceEvent {
    OwnerAdded {
        owner: Address,
        by: Address,
        route: AuthRoute,
    },
    OwnerRemoved {
        owner: Address,
        by: Address,
        route: AuthRoute,
    },
    NativeTokenSent {
        to: Address,
        amount: Amount,
        by: Address,
        route: AuthRoute,
    },
    Deposited {
        from: Address,
        amount: Amount,
    },
    WalletCreated {
        index: u64,
        wallet: Address,
        seed_owner: Address,
        by: Address,
    },
}

impl GovernanceEvent {
    /// Short upper-case tag for log lines.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::OwnerAdded { .. } => "OWNER_ADDED",
            Self::OwnerRemoved { .. } => "OWNER_REMOVED",
            Self::NativeTokenSent { .. } => "NATIVE_TOKEN_SENT",
            Self::Deposited { .. } => "DEPOSITED",
            Self::WalletCreated { .. } => "WALLET_CREATED",
        }
    }
}

/// A governance event bound to the unit it happened on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Position in the host's log (0-based, gap-free).
    pub sequence: u64,
    /// The wallet or factory the event applies to.
    pub unit: Address,
    pub event: GovernanceEvent,
    pub recorded_at: DateTime<Utc>,
}
