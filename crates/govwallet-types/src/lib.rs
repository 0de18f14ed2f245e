//! # govwallet-types
//!
//! Shared types, errors, and configuration for **govwallet**, an
//! owner-governed wallet with signature-authorized command dispatch.
//!
//! This crate is the leaf dependency of the workspace: every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`Address`], [`Selector`], [`Amount`]
//! - **Signed commands**: [`SignedCommand`], [`SIGNATURE_LEN`]
//! - **Events**: [`GovernanceEvent`], [`EventRecord`]
//! - **Configuration**: [`ChainConfig`], [`LedgerConfig`]
//! - **Errors**: [`WalletError`] with `WF_ERR_` prefix codes
//! - **Hashing**: [`keccak256`]
//! - **Constants**: canonical function signatures and defaults

pub mod command;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;

// Re-export all primary types at crate root for ergonomic imports:
//   use govwallet_types::{Address, Selector, WalletError, ...};

pub use command::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;

// Constants are accessed via `govwallet_types::constants::FOO`
// (not re-exported to avoid name collisions).

use sha3::{Digest, Keccak256};

/// Keccak-256 (the pre-standard SHA-3 variant used for EVM hashing).
#[must_use]
pub fn keccak256(input: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(input);
    hasher.finalize().into()
}
