//! # govwallet-factory
//!
//! **Wallet instances, the wallet factory, and the host they run on.**
//!
//! ## Architecture
//!
//! 1. **Wallet**: owner registry + treasury + signed entry points for one
//!    governed unit
//! 2. **WalletFactory**: a wallet that can also create independent wallets,
//!    tracked by a 1-based creation index
//! 3. **Chain**: serialized in-process host with EOA balances, a unit table,
//!    the external token ledger, and the event log
//!
//! ## Flow
//!
//! ```text
//! EOA ──deposit──▶ Unit.receive()
//! caller ─direct──▶ Chain ─▶ detach unit ─▶ Wallet op ─▶ ValueSink ─▶ recipient
//! anyone ─signed──▶ Chain ─▶ detach unit ─▶ authorize ─▶ Wallet op ─▶ …
//! owner ─create───▶ Chain ─▶ WalletFactory.create_wallet ─▶ new Unit
//! ```

pub mod address;
pub mod chain;
pub mod factory;
pub mod ledger;
pub mod wallet;

pub use address::derive_address;
pub use chain::{Chain, Unit};
pub use factory::WalletFactory;
pub use ledger::TokenLedger;
pub use wallet::Wallet;
