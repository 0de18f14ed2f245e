//! Signed-command verification.
//!
//! One entry per governed operation turns a [`SignedCommand`] submitted by
//! anyone into an [`Authorized`]: the recovered signer plus the typed
//! parameters of that operation. The caller then runs the matching direct
//! operation with the signer as the caller, so every owner-level rule
//! applies exactly as for a direct call.
//!
//! Check order:
//!
//! 1. Recover the signer (`InvalidSignature`)
//! 2. Selector matches the entry point (`MalformedCall`, `WrongSelector`)
//! 3. Signer is a current owner (`InvalidSigner`)
//! 4. Parameters decode (`MalformedCall`)
//!
//! Nothing is mutated on any path.

use govwallet_governance::OwnerRegistry;
use govwallet_types::{Address, Amount, Result, Selector, SignedCommand, WalletError};

use crate::abi::{CallKind, decode_owner_param, decode_send_params};
use crate::signing::{command_hash, recover_signer};

/// A verified command, ready to run as a direct call by `signer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Authorized<P> {
    pub signer: Address,
    pub params: P,
}

/// Verify an `addOwner(address)` command. `params` is the owner to add.
///
/// # Errors
/// `InvalidSignature`, `MalformedCall`, `WrongSelector`, or `InvalidSigner`.
pub fn authorize_add_owner(
    command: &SignedCommand,
    owners: &OwnerRegistry,
) -> Result<Authorized<Address>> {
    let signer = verify_signer(CallKind::AddOwner, command, owners)?;
    let owner = decode_owner_param(CallKind::AddOwner, command.params())?;
    Ok(Authorized {
        signer,
        params: owner,
    })
}

/// Verify a `removeOwner(address)` command. `params` is the owner to remove.
///
/// # Errors
/// `InvalidSignature`, `MalformedCall`, `WrongSelector`, or `InvalidSigner`.
pub fn authorize_remove_owner(
    command: &SignedCommand,
    owners: &OwnerRegistry,
) -> Result<Authorized<Address>> {
    let signer = verify_signer(CallKind::RemoveOwner, command, owners)?;
    let owner = decode_owner_param(CallKind::RemoveOwner, command.params())?;
    Ok(Authorized {
        signer,
        params: owner,
    })
}

/// Verify a `sendNativeToken(address,uint256)` command. `params` is
/// `(to, amount)`.
///
/// # Errors
/// `InvalidSignature`, `MalformedCall`, `WrongSelector`, or `InvalidSigner`.
pub fn authorize_send_native_token(
    command: &SignedCommand,
    owners: &OwnerRegistry,
) -> Result<Authorized<(Address, Amount)>> {
    let signer = verify_signer(CallKind::SendNativeToken, command, owners)?;
    let params = decode_send_params(command.params())?;
    Ok(Authorized { signer, params })
}

/// Steps 1 to 3: recover, bind the selector, check ownership.
fn verify_signer(
    expected: CallKind,
    command: &SignedCommand,
    owners: &OwnerRegistry,
) -> Result<Address> {
    let hash = command_hash(&command.encoded_call);
    let signer = recover_signer(&hash, &command.signature).inspect_err(|err| {
        tracing::warn!(entry = %expected, error = %err, "Rejected signed command: bad signature");
    })?;
    tracing::debug!(
        entry = %expected,
        signer = %signer,
        hash = %hex::encode(hash),
        "Recovered command signer"
    );

    let actual = command.selector().ok_or_else(|| WalletError::MalformedCall {
        reason: "call shorter than a selector".into(),
    })?;
    let wanted: Selector = expected.selector();
    if actual != wanted {
        tracing::warn!(
            entry = %expected,
            expected = %wanted,
            actual = %actual,
            signer = %signer,
            "Rejected signed command: wrong selector"
        );
        return Err(WalletError::WrongSelector {
            expected: wanted,
            actual,
        });
    }

    if !owners.is_owner(&signer) {
        tracing::warn!(entry = %expected, signer = %signer, "Rejected signed command: signer is not an owner");
        return Err(WalletError::InvalidSigner { signer });
    }
    Ok(signer)
}
