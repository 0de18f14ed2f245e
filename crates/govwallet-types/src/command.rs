//! Signed commands: an encoded governance call plus a detached signature.
//!
//! A signed command is ephemeral. It is verified on every submission and
//! carries no nonce or expiry, so the same command may be submitted again
//! for as long as its preconditions keep holding.

use serde::{Deserialize, Serialize};

use crate::{Selector, constants};

/// Length of a recoverable secp256k1 signature: `r (32) || s (32) || v (1)`.
pub const SIGNATURE_LEN: usize = 65;

/// An encoded call and the signature authorizing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedCommand {
    /// Selector followed by ABI-encoded parameters.
    #[serde(with = "hex_bytes")]
    pub encoded_call: Vec<u8>,
    /// Signature over the framed hash of `encoded_call`.
    #[serde(with = "hex_bytes")]
    pub signature: Vec<u8>,
}

impl SignedCommand {
    #[must_use]
    pub fn new(encoded_call: Vec<u8>, signature: Vec<u8>) -> Self {
        Self {
            encoded_call,
            signature,
        }
    }

    /// Leading selector of the encoded call, if the call is long enough.
    #[must_use]
    pub fn selector(&self) -> Option<Selector> {
        Selector::from_call(&self.encoded_call)
    }

    /// Encoded parameters following the selector.
    #[must_use]
    pub fn params(&self) -> &[u8] {
        self.encoded_call
            .get(constants::SELECTOR_LEN..)
            .unwrap_or_default()
    }
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s.strip_prefix("0x").unwrap_or(&s)).map_err(serde::de::Error::custom)
    }
}
