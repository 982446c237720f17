//! The in-process change feed behind realtime subscriptions.
//!
//! Every successful write publishes a [`Change`] naming what was touched and
//! whose it was. Subscribers re-read their collection when a change concerns
//! them and forward the fresh snapshot.

use tokio::sync::broadcast;
use vow_core::document::{Collection, OwnerId};

/// Buffered changes per receiver before it lags. A lagging subscriber simply
/// re-reads, so nothing is lost but intermediate snapshots.
pub(crate) const CHANGE_BUFFER: usize = 256;

/// What a write touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeTarget {
  Plan,
  Collection(Collection),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
  pub target:   ChangeTarget,
  pub owner_id: OwnerId,
}

impl Change {
  pub fn affects(&self, target: ChangeTarget, owner_id: &OwnerId) -> bool {
    self.target == target && &self.owner_id == owner_id
  }
}

pub(crate) fn channel() -> broadcast::Sender<Change> {
  let (tx, _) = broadcast::channel(CHANGE_BUFFER);
  tx
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn change_is_scoped_to_target_and_owner() {
    let change = Change {
      target:   ChangeTarget::Collection(Collection::Guests),
      owner_id: OwnerId::from("a"),
    };
    let guests = ChangeTarget::Collection(Collection::Guests);
    assert!(change.affects(guests, &OwnerId::from("a")));
    assert!(!change.affects(guests, &OwnerId::from("b")));
    assert!(!change.affects(ChangeTarget::Plan, &OwnerId::from("a")));
  }
}
