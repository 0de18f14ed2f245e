//! ABI codec for the three governed calls.
//!
//! An encoded call is a 4-byte selector followed by one 32-byte word per
//! parameter. Dispatch is an explicit decode: selector → [`CallKind`] →
//! typed parameters. Unknown selectors are rejected before any parameter is
//! looked at.
//!
//! Decoding follows the strict ABI rules: an `address` word must carry 12
//! zero bytes of padding, and words must be complete. Bytes past the last
//! expected word are ignored. `uint256` values wider than 128 bits are
//! rejected since no balance can ever cover them.

use govwallet_types::constants::{
    ABI_WORD_LEN, ADD_OWNER_SIGNATURE, REMOVE_OWNER_SIGNATURE, SELECTOR_LEN,
    SEND_NATIVE_TOKEN_SIGNATURE,
};
use govwallet_types::{Address, Amount, Result, Selector, WalletError};

/// The governed operations reachable through a signed command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    AddOwner,
    RemoveOwner,
    SendNativeToken,
}

impl CallKind {
    pub const ALL: [Self; 3] = [Self::AddOwner, Self::RemoveOwner, Self::SendNativeToken];

    /// Canonical function signature the selector is derived from.
    #[must_use]
    pub fn signature(self) -> &'static str {
        match self {
            Self::AddOwner => ADD_OWNER_SIGNATURE,
            Self::RemoveOwner => REMOVE_OWNER_SIGNATURE,
            Self::SendNativeToken => SEND_NATIVE_TOKEN_SIGNATURE,
        }
    }

    #[must_use]
    pub fn selector(self) -> Selector {
        Selector::from_signature(self.signature())
    }

    /// Map a selector back to the operation it identifies.
    #[must_use]
    pub fn from_selector(selector: Selector) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.selector() == selector)
    }

    /// Number of 32-byte parameter words the operation takes.
    #[must_use]
    pub fn param_words(self) -> usize {
        match self {
            Self::AddOwner | Self::RemoveOwner => 1,
            Self::SendNativeToken => 2,
        }
    }
}

impl std::fmt::Display for CallKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.signature())
    }
}

/// A decoded governed call with typed parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GovernanceCall {
    AddOwner { owner: Address },
    RemoveOwner { owner: Address },
    SendNativeToken { to: Address, amount: Amount },
}

impl GovernanceCall {
    #[must_use]
    pub fn kind(&self) -> CallKind {
        match self {
            Self::AddOwner { .. } => CallKind::AddOwner,
            Self::RemoveOwner { .. } => CallKind::RemoveOwner,
            Self::SendNativeToken { .. } => CallKind::SendNativeToken,
        }
    }

    /// Selector followed by the parameter words.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let kind = self.kind();
        let mut out = Vec::with_capacity(SELECTOR_LEN + kind.param_words() * ABI_WORD_LEN);
        out.extend_from_slice(kind.selector().as_bytes());
        match self {
            Self::AddOwner { owner } | Self::RemoveOwner { owner } => {
                out.extend_from_slice(&address_word(owner));
            }
            Self::SendNativeToken { to, amount } => {
                out.extend_from_slice(&address_word(to));
                out.extend_from_slice(&uint_word(*amount));
            }
        }
        out
    }

    /// Decode a full call, identifying the operation from its selector.
    ///
    /// # Errors
    /// `MalformedCall` for short input, an unknown selector, or bad words.
    pub fn decode(encoded: &[u8]) -> Result<Self> {
        let selector = Selector::from_call(encoded)
            .ok_or_else(|| malformed("call shorter than a selector"))?;
        let kind = CallKind::from_selector(selector)
            .ok_or_else(|| malformed(format!("unknown selector {selector}")))?;
        Self::decode_params(kind, &encoded[SELECTOR_LEN..])
    }

    /// Decode the parameter words of a call already known to be `kind`.
    ///
    /// # Errors
    /// `MalformedCall` if the words are missing or invalid.
    pub fn decode_params(kind: CallKind, params: &[u8]) -> Result<Self> {
        Ok(match kind {
            CallKind::AddOwner => Self::AddOwner {
                owner: decode_owner_param(kind, params)?,
            },
            CallKind::RemoveOwner => Self::RemoveOwner {
                owner: decode_owner_param(kind, params)?,
            },
            CallKind::SendNativeToken => {
                let (to, amount) = decode_send_params(params)?;
                Self::SendNativeToken { to, amount }
            }
        })
    }
}

/// The `address` parameter of `addOwner` or `removeOwner`.
///
/// # Errors
/// `MalformedCall` if the word is missing or has dirty padding.
pub fn decode_owner_param(kind: CallKind, params: &[u8]) -> Result<Address> {
    let words = param_words(kind, params)?;
    decode_address(words[0])
}

/// The `(to, amount)` parameters of `sendNativeToken`.
///
/// # Errors
/// `MalformedCall` if a word is missing or invalid.
pub fn decode_send_params(params: &[u8]) -> Result<(Address, Amount)> {
    let words = param_words(CallKind::SendNativeToken, params)?;
    Ok((decode_address(words[0])?, decode_uint(words[1])?))
}

/// Split `params` into exactly the words `kind` takes.
fn param_words(kind: CallKind, params: &[u8]) -> Result<Vec<&[u8]>> {
    let needed = kind.param_words() * ABI_WORD_LEN;
    if params.len() < needed {
        return Err(malformed(format!(
            "{kind} needs {needed} parameter bytes, got {}",
            params.len()
        )));
    }
    Ok(params[..needed].chunks_exact(ABI_WORD_LEN).collect())
}

fn malformed(reason: impl Into<String>) -> WalletError {
    WalletError::MalformedCall {
        reason: reason.into(),
    }
}

/// Left-pad an address to a full word.
#[must_use]
pub fn address_word(address: &Address) -> [u8; ABI_WORD_LEN] {
    let mut word = [0u8; ABI_WORD_LEN];
    word[12..].copy_from_slice(address.as_bytes());
    word
}

/// Big-endian `uint256` word for an amount.
#[must_use]
pub fn uint_word(value: Amount) -> [u8; ABI_WORD_LEN] {
    let mut word = [0u8; ABI_WORD_LEN];
    word[16..].copy_from_slice(&value.to_be_bytes());
    word
}

fn decode_address(word: &[u8]) -> Result<Address> {
    if word[..12].iter().any(|b| *b != 0) {
        return Err(malformed(format!(
            "address word has dirty padding: 0x{}",
            hex::encode(word)
        )));
    }
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&word[12..]);
    Ok(Address(bytes))
}

fn decode_uint(word: &[u8]) -> Result<Amount> {
    if word[..16].iter().any(|b| *b != 0) {
        return Err(malformed("uint256 amount exceeds 128 bits"));
    }
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&word[16..]);
    Ok(Amount::from_be_bytes(bytes))
}
