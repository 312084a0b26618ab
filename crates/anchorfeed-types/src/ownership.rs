//! Two-step administrative ownership.
//!
//! Owner-gated operations take the caller's [`AccountId`] explicitly.
//! Handoff is two-step: the owner nominates a successor, the successor
//! accepts. A nomination can be replaced at any time before acceptance.

use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use crate::events::{OwnershipTransferRequested, OwnershipTransferred};
use crate::AccountId;

/// Errors from ownership checks and transitions.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum OwnershipError {
    /// The caller is not the current owner.
    #[error("caller is not the owner")]
    NotOwner,

    /// The caller is not the nominated successor.
    #[error("caller is not the pending owner")]
    NotPendingOwner,

    /// The owner tried to nominate itself.
    #[error("cannot transfer ownership to the current owner")]
    TransferToSelf,
}

/// Ownership state shared by both oracle surfaces.
#[serde_as]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Ownable {
    #[serde_as(as = "serde_with::hex::Hex")]
    owner: AccountId,
    #[serde_as(as = "Option<serde_with::hex::Hex>")]
    pending: Option<AccountId>,
}

impl Ownable {
    pub fn new(owner: AccountId) -> Self {
        Self {
            owner,
            pending: None,
        }
    }

    /// The current owner.
    pub fn owner(&self) -> AccountId {
        self.owner
    }

    /// The nominated successor, if a transfer is in flight.
    pub fn pending_owner(&self) -> Option<AccountId> {
        self.pending
    }

    /// Check that `caller` is the current owner.
    pub fn ensure_owner(&self, caller: AccountId) -> Result<(), OwnershipError> {
        if caller == self.owner {
            Ok(())
        } else {
            Err(OwnershipError::NotOwner)
        }
    }

    /// Nominate `successor` as the next owner.
    ///
    /// Replaces any earlier nomination. Ownership does not change until the
    /// successor calls [`Ownable::accept`].
    pub fn transfer(
        &mut self,
        caller: AccountId,
        successor: AccountId,
    ) -> Result<OwnershipTransferRequested, OwnershipError> {
        self.ensure_owner(caller)?;
        if successor == self.owner {
            return Err(OwnershipError::TransferToSelf);
        }
        self.pending = Some(successor);
        tracing::info!(
            from = %hex::encode(self.owner),
            to = %hex::encode(successor),
            "ownership transfer requested"
        );
        Ok(OwnershipTransferRequested {
            from: self.owner,
            to: successor,
        })
    }

    /// Complete a pending transfer as the nominated successor.
    pub fn accept(&mut self, caller: AccountId) -> Result<OwnershipTransferred, OwnershipError> {
        if self.pending != Some(caller) {
            return Err(OwnershipError::NotPendingOwner);
        }
        let previous = self.owner;
        self.owner = caller;
        self.pending = None;
        tracing::info!(
            from = %hex::encode(previous),
            to = %hex::encode(caller),
            "ownership transferred"
        );
        Ok(OwnershipTransferred {
            from: previous,
            to: caller,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: AccountId = [1u8; 20];
    const BOB: AccountId = [2u8; 20];
    const CAROL: AccountId = [3u8; 20];

    #[test]
    fn test_transfer_then_accept() {
        let mut owned = Ownable::new(ALICE);
        let requested = owned.transfer(ALICE, BOB).expect("nominate");
        assert_eq!(requested.from, ALICE);
        assert_eq!(requested.to, BOB);
        assert_eq!(owned.owner(), ALICE);
        assert_eq!(owned.pending_owner(), Some(BOB));

        let transferred = owned.accept(BOB).expect("accept");
        assert_eq!(transferred.from, ALICE);
        assert_eq!(transferred.to, BOB);
        assert_eq!(owned.owner(), BOB);
        assert_eq!(owned.pending_owner(), None);
    }

    #[test]
    fn test_transfer_requires_owner() {
        let mut owned = Ownable::new(ALICE);
        let err = owned.transfer(BOB, CAROL).unwrap_err();
        assert_eq!(err, OwnershipError::NotOwner);
    }

    #[test]
    fn test_transfer_to_self_rejected() {
        let mut owned = Ownable::new(ALICE);
        let err = owned.transfer(ALICE, ALICE).unwrap_err();
        assert_eq!(err, OwnershipError::TransferToSelf);
    }

    #[test]
    fn test_accept_requires_nomination() {
        let mut owned = Ownable::new(ALICE);
        let err = owned.accept(BOB).unwrap_err();
        assert_eq!(err, OwnershipError::NotPendingOwner);

        owned.transfer(ALICE, BOB).expect("nominate");
        let err = owned.accept(CAROL).unwrap_err();
        assert_eq!(err, OwnershipError::NotPendingOwner);
    }

    #[test]
    fn test_nomination_can_be_replaced() {
        let mut owned = Ownable::new(ALICE);
        owned.transfer(ALICE, BOB).expect("nominate");
        owned.transfer(ALICE, CAROL).expect("replace");
        assert_eq!(owned.pending_owner(), Some(CAROL));

        let err = owned.accept(BOB).unwrap_err();
        assert_eq!(err, OwnershipError::NotPendingOwner);
        owned.accept(CAROL).expect("accept");
        assert_eq!(owned.owner(), CAROL);
    }

    #[test]
    fn test_old_owner_loses_rights_after_accept() {
        let mut owned = Ownable::new(ALICE);
        owned.transfer(ALICE, BOB).expect("nominate");
        owned.accept(BOB).expect("accept");
        let err = owned.transfer(ALICE, CAROL).unwrap_err();
        assert_eq!(err, OwnershipError::NotOwner);
    }
}
