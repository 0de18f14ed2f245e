//! Command hashing, signing, and signer recovery.
//!
//! ## Hash scheme
//!
//! ```text
//! digest       = keccak256(encoded_call)
//! message_hash = keccak256("\x19Ethereum Signed Message:\n32" || digest)
//! ```
//!
//! Signatures are 65 bytes `r || s || v`. `v` is accepted as `27/28` or
//! `0/1`; high-`s` signatures are rejected.

use govwallet_types::constants::SIGNED_MESSAGE_PREFIX;
use govwallet_types::{Address, Result, SIGNATURE_LEN, SignedCommand, WalletError, keccak256};
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use k256::elliptic_curve::scalar::IsHigh as _;
use k256::elliptic_curve::sec1::ToEncodedPoint as _;

use crate::abi::GovernanceCall;

/// `keccak256` of the raw encoded call.
#[must_use]
pub fn command_digest(encoded_call: &[u8]) -> [u8; 32] {
    keccak256(encoded_call)
}

/// Frame a 32-byte digest with the signed-message prefix and hash it.
#[must_use]
pub fn signed_message_hash(digest: &[u8; 32]) -> [u8; 32] {
    let mut framed = Vec::with_capacity(SIGNED_MESSAGE_PREFIX.len() + digest.len());
    framed.extend_from_slice(SIGNED_MESSAGE_PREFIX);
    framed.extend_from_slice(digest);
    keccak256(&framed)
}

/// The hash a command signature is produced over.
#[must_use]
pub fn command_hash(encoded_call: &[u8]) -> [u8; 32] {
    signed_message_hash(&command_digest(encoded_call))
}

/// Address of a secp256k1 public key.
#[must_use]
pub fn address_of(key: &VerifyingKey) -> Address {
    let encoded = key.to_encoded_point(false);
    // Skip the 0x04 prefix byte, hash the 64 bytes of (x, y).
    Address::from_public_key_tail(&encoded.as_bytes()[1..])
}

fn invalid(reason: impl Into<String>) -> WalletError {
    WalletError::InvalidSignature {
        reason: reason.into(),
    }
}

/// Recover the identity that produced `signature` over `message_hash`.
///
/// # Errors
/// `InvalidSignature` for a wrong length, bad `v`, zero or high-`s`
/// scalars, or when no public key can be recovered.
pub fn recover_signer(message_hash: &[u8; 32], signature: &[u8]) -> Result<Address> {
    if signature.len() != SIGNATURE_LEN {
        return Err(invalid(format!(
            "expected {SIGNATURE_LEN} bytes, got {}",
            signature.len()
        )));
    }

    let v = signature[64];
    let normalized_v = if v >= 27 { v - 27 } else { v };
    let recovery_id = match normalized_v {
        0 | 1 => RecoveryId::from_byte(normalized_v),
        _ => None,
    }
    .ok_or_else(|| invalid(format!("invalid recovery byte {v}")))?;

    let sig = Signature::from_slice(&signature[..64]).map_err(|e| invalid(e.to_string()))?;
    if bool::from(sig.s().is_high()) {
        return Err(invalid("high-s signature"));
    }

    let key = VerifyingKey::recover_from_prehash(message_hash, &sig, recovery_id)
        .map_err(|e| invalid(format!("recovery failed: {e}")))?;
    Ok(address_of(&key))
}

/// Off-line signer for governance commands.
///
/// Holds a secp256k1 key and produces [`SignedCommand`]s that anyone can
/// later submit on the key holder's behalf.
pub struct CommandSigner {
    key: SigningKey,
    address: Address,
}

impl CommandSigner {
    /// Fresh key from the OS random source.
    #[must_use]
    pub fn random() -> Self {
        Self::from_key(SigningKey::random(&mut rand::rngs::OsRng))
    }

    /// Key from 32 secret bytes.
    ///
    /// # Errors
    /// `InvalidSignature` if the bytes are not a valid secp256k1 scalar.
    pub fn from_secret_bytes(secret: &[u8; 32]) -> Result<Self> {
        let key = SigningKey::from_bytes(secret.into())
            .map_err(|e| invalid(format!("invalid secret key: {e}")))?;
        Ok(Self::from_key(key))
    }

    /// Deterministic key derived from a label, stable across runs.
    pub fn from_label(label: &str) -> Result<Self> {
        const DOMAIN: &[u8] = b"govwallet command signer:";
        let mut seed = Vec::with_capacity(DOMAIN.len() + label.len());
        seed.extend_from_slice(DOMAIN);
        seed.extend_from_slice(label.as_bytes());
        Self::from_secret_bytes(&keccak256(&seed))
    }

    fn from_key(key: SigningKey) -> Self {
        let address = address_of(key.verifying_key());
        Self { key, address }
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    /// Sign a prehashed 32-byte message. Returns `r || s || v` with
    /// `v ∈ {27, 28}`.
    pub fn sign_hash(&self, message_hash: &[u8; 32]) -> Result<[u8; SIGNATURE_LEN]> {
        let (sig, recovery_id) = self
            .key
            .sign_prehash_recoverable(message_hash)
            .map_err(|e| invalid(format!("signing failed: {e}")))?;

        let mut out = [0u8; SIGNATURE_LEN];
        out[..64].copy_from_slice(&sig.to_bytes());
        out[64] = recovery_id.to_byte() + 27;
        Ok(out)
    }

    /// Sign arbitrary encoded bytes as a command.
    pub fn sign_encoded(&self, encoded_call: Vec<u8>) -> Result<SignedCommand> {
        let signature = self.sign_hash(&command_hash(&encoded_call))?;
        Ok(SignedCommand::new(encoded_call, signature.to_vec()))
    }

    /// Encode and sign a governed call.
    pub fn sign_call(&self, call: &GovernanceCall) -> Result<SignedCommand> {
        self.sign_encoded(call.encode())
    }
}

impl std::fmt::Debug for CommandSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSigner")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
