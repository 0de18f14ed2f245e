//! # govwallet-dispatch
//!
//! **Signature-authorized command dispatch.** An owner signs an encoded
//! governance call off-line; anyone may submit it. The submitter gains no
//! authority: the call runs as if the signer had called directly.
//!
//! ## Modules
//!
//! - [`abi`]: selectors and 32-byte-word encoding of the governed calls
//! - [`signing`]: EIP-191 framing, secp256k1 signing, signer recovery
//! - [`dispatcher`]: the verification pipeline in front of every
//!   `*_with_signature` entry point
//!
//! ## Known gap
//!
//! Commands carry no nonce, expiry, chain id, or target address. A valid
//! signed command can be resubmitted, and replayed against any other unit
//! the signer also owns, for as long as its preconditions hold.

pub mod abi;
pub mod dispatcher;
pub mod signing;

pub use abi::{CallKind, GovernanceCall};
pub use dispatcher::{
    Authorized, authorize_add_owner, authorize_remove_owner, authorize_send_native_token,
};
pub use signing::{CommandSigner, command_hash, recover_signer};
