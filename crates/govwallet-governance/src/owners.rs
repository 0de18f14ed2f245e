//! Owner registry for one governed unit.
//!
//! Owners are kept in insertion order next to a presence index, so
//! membership is O(1) and listing preserves the order owners were added.
//! Removal is stable. There is no minimum owner count: the last owner may
//! remove itself, after which nothing can authorize a governed call again.

use std::collections::HashSet;

use govwallet_types::{Address, Result, WalletError};

/// The authorized-identity set of one wallet or factory.
#[derive(Debug, Clone)]
pub struct OwnerRegistry {
    /// Owners in insertion order.
    ordered: Vec<Address>,
    /// Presence index over `ordered`.
    present: HashSet<Address>,
}

impl OwnerRegistry {
    /// Create a registry with exactly one seed owner.
    ///
    /// # Errors
    /// Returns `ZeroAddress` if `seed` is the zero identity.
    pub fn new(seed: Address) -> Result<Self> {
        if seed.is_zero() {
            return Err(WalletError::ZeroAddress);
        }
        Ok(Self {
            ordered: vec![seed],
            present: HashSet::from([seed]),
        })
    }

    /// O(1) membership test.
    #[must_use]
    pub fn is_owner(&self, identity: &Address) -> bool {
        self.present.contains(identity)
    }

    /// Current owners in insertion order.
    #[must_use]
    pub fn owners(&self) -> Vec<Address> {
        self.ordered.clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// The authorization gate shared by every governed operation.
    ///
    /// # Errors
    /// Returns `OnlyOwner` if `caller` is not a current owner.
    pub fn ensure_owner(&self, caller: &Address) -> Result<()> {
        if self.is_owner(caller) {
            Ok(())
        } else {
            Err(WalletError::OnlyOwner { caller: *caller })
        }
    }

    /// Append `identity` to the owner set.
    ///
    /// # Errors
    /// - `OnlyOwner` if `caller` is not an owner
    /// - `ZeroAddress` if `identity` is zero
    /// - `OwnerExists` if `identity` is already an owner
    pub fn add_owner(&mut self, caller: &Address, identity: Address) -> Result<()> {
        self.ensure_owner(caller)?;
        if identity.is_zero() {
            return Err(WalletError::ZeroAddress);
        }
        if self.is_owner(&identity) {
            return Err(WalletError::OwnerExists(identity));
        }

        self.ordered.push(identity);
        self.present.insert(identity);

        tracing::info!(
            owner = %identity,
            by = %caller,
            owners = self.ordered.len(),
            "Owner added"
        );
        Ok(())
    }

    /// Remove `identity`, keeping the relative order of everyone else.
    ///
    /// # Errors
    /// - `OnlyOwner` if `caller` is not an owner
    /// - `NotAnOwner` if `identity` is not an owner
    pub fn remove_owner(&mut self, caller: &Address, identity: Address) -> Result<()> {
        self.ensure_owner(caller)?;
        if !self.present.remove(&identity) {
            return Err(WalletError::NotAnOwner(identity));
        }
        self.ordered.retain(|owner| *owner != identity);

        if self.ordered.is_empty() {
            tracing::warn!(
                removed = %identity,
                by = %caller,
                "Last owner removed: unit can no longer be governed"
            );
        } else {
            tracing::info!(
                owner = %identity,
                by = %caller,
                owners = self.ordered.len(),
                "Owner removed"
            );
        }
        Ok(())
    }
}
