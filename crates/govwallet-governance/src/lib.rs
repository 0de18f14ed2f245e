//! # govwallet-governance
//!
//! **Authorization core**: the owner registry and the treasury of one
//! governed unit.
//!
//! ## Architecture
//!
//! 1. **OwnerRegistry**: ordered, duplicate-free owner set with an O(1)
//!    presence index; the single authorization predicate for every
//!    governed operation
//! 2. **Treasury**: native balance accounting with ungated deposits and
//!    owner-gated, debit-first transfers
//!
//! ## Call Flow
//!
//! ```text
//! direct call ──────────────┐
//!                           ├─▶ OwnerRegistry.ensure_owner() ─▶ mutation
//! signed command ─▶ verify ─┘
//! ```
//!
//! Both entry styles converge on the same functions in this crate, so there
//! is exactly one authorization rule for each operation.

pub mod owners;
pub mod treasury;

pub use owners::OwnerRegistry;
pub use treasury::{ExternalLedger, OutboundTransfer, Treasury, ValueSink};
