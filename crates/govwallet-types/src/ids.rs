//! Identifiers used throughout govwallet.
//!
//! Identities are 20-byte EVM-style addresses: the right-most 20 bytes of
//! `keccak256` over an uncompressed secp256k1 public key (or over the RLP
//! creation tuple for wallet instances). The all-zero address is reserved.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{WalletError, keccak256};

/// Native value amount in the smallest unit (wei-like).
pub type Amount = u128;

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// A 20-byte account identity. Used for owners, transfer targets, and
/// wallet instance addresses alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The reserved zero identity. Never a valid owner or recipient.
    pub const ZERO: Self = Self([0u8; 20]);

    /// Address whose low eight bytes hold `n` big-endian. Handy for fixtures
    /// and for synthetic ledger identities.
    #[must_use]
    pub const fn from_low_u64(n: u64) -> Self {
        let be = n.to_be_bytes();
        let mut bytes = [0u8; 20];
        let mut i = 0;
        while i < 8 {
            bytes[12 + i] = be[i];
            i += 1;
        }
        Self(bytes)
    }

    /// Derive an address from the 64-byte `x || y` tail of an uncompressed
    /// public key.
    #[must_use]
    pub fn from_public_key_tail(uncompressed_no_prefix: &[u8]) -> Self {
        Self::from_hash_tail(&keccak256(uncompressed_no_prefix))
    }

    /// Take the right-most 20 bytes of a 32-byte hash.
    #[must_use]
    pub fn from_hash_tail(hash: &[u8; 32]) -> Self {
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&hash[12..]);
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let raw = hex::decode(digits)
            .map_err(|e| WalletError::Serialization(format!("invalid address {s}: {e}")))?;
        let bytes: [u8; 20] = raw.try_into().map_err(|_| {
            WalletError::Serialization(format!("address {s} is not 20 bytes"))
        })?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for Address {
    type Error = WalletError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(value: Address) -> Self {
        value.to_string()
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Random identity for tests. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl Address {
    #[must_use]
    pub fn random() -> Self {
        let mut bytes: [u8; 20] = rand::random();
        // The zero address is reserved; make sure we never hand it out.
        bytes[0] |= 1;
        Self(bytes)
    }
}

// ---------------------------------------------------------------------------
// Selector
// ---------------------------------------------------------------------------

/// The 4-byte leading tag of an encoded call: the first four bytes of
/// `keccak256` over the canonical function signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Selector(pub [u8; 4]);

impl Selector {
    /// Selector for a canonical signature such as `"addOwner(address)"`.
    #[must_use]
    pub fn from_signature(signature: &str) -> Self {
        let hash = keccak256(signature.as_bytes());
        Self([hash[0], hash[1], hash[2], hash[3]])
    }

    /// Read the selector from the head of an encoded call, if present.
    #[must_use]
    pub fn from_call(encoded: &[u8]) -> Option<Self> {
        let head: [u8; 4] = encoded.get(..4)?.try_into().ok()?;
        Some(Self(head))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
