//! Push-based collection snapshots.
//!
//! A [`Subscription`] yields the full, sorted contents of one owner's
//! collection: once on subscribe and again after every change. Snapshots are
//! whole arrays, never diffs. Consumers pull them with [`Subscription::next`].

use tokio::{sync::mpsc, task::JoinHandle};

/// Capacity of the snapshot channel between a store and its subscriber.
pub const SNAPSHOT_BUFFER: usize = 16;

/// A live, cancellable sequence of collection snapshots.
///
/// Dropping the subscription unsubscribes. Subscribing again starts a fresh
/// sequence from the store's current state.
#[derive(Debug)]
pub struct Subscription<T> {
  rx:     mpsc::Receiver<Vec<T>>,
  /// The store-side task feeding `rx`, if any.
  feeder: Option<JoinHandle<()>>,
  closed: bool,
}

impl<T: Send + 'static> Subscription<T> {
  /// Wrap a snapshot channel fed by `feeder`. The feeder is aborted on
  /// unsubscribe.
  pub fn new(rx: mpsc::Receiver<Vec<T>>, feeder: JoinHandle<()>) -> Self {
    Self { rx, feeder: Some(feeder), closed: false }
  }

  /// A finite subscription replaying `snapshots` in order, then ending.
  pub fn from_snapshots(snapshots: impl IntoIterator<Item = Vec<T>>) -> Self {
    let snapshots: Vec<Vec<T>> = snapshots.into_iter().collect();
    let (tx, rx) = mpsc::channel(snapshots.len().max(1));
    for snapshot in snapshots {
      // Capacity covers every snapshot, so this cannot fail.
      let _ = tx.try_send(snapshot);
    }
    Self { rx, feeder: None, closed: false }
  }

  /// Wait for the next snapshot. `None` once the sequence has ended or the
  /// subscription was cancelled.
  pub async fn next(&mut self) -> Option<Vec<T>> {
    if self.closed {
      return None;
    }
    let snapshot = self.rx.recv().await;
    if snapshot.is_none() {
      self.closed = true;
    }
    snapshot
  }

  /// Stop receiving snapshots. Safe to call any number of times.
  pub fn unsubscribe(&mut self) {
    if let Some(feeder) = self.feeder.take() {
      feeder.abort();
    }
    self.rx.close();
    self.closed = true;
  }

  pub fn is_active(&self) -> bool { !self.closed }
}

impl<T> Drop for Subscription<T> {
  fn drop(&mut self) {
    if let Some(feeder) = self.feeder.take() {
      feeder.abort();
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn replays_synthetic_snapshots_then_ends() {
    let mut sub = Subscription::from_snapshots(vec![vec![1], vec![1, 2]]);
    assert_eq!(sub.next().await, Some(vec![1]));
    assert_eq!(sub.next().await, Some(vec![1, 2]));
    assert_eq!(sub.next().await, None);
    assert!(!sub.is_active());
  }

  #[tokio::test]
  async fn empty_sequence_ends_immediately() {
    let mut sub = Subscription::<u8>::from_snapshots(Vec::new());
    assert_eq!(sub.next().await, None);
  }

  #[tokio::test]
  async fn unsubscribe_is_idempotent_and_stops_delivery() {
    let (tx, rx) = mpsc::channel(4);
    let feeder = tokio::spawn(async move {
      let _ = tx.send(vec!["a"]).await;
      std::future::pending::<()>().await;
    });
    let mut sub = Subscription::new(rx, feeder);
    assert_eq!(sub.next().await, Some(vec!["a"]));

    sub.unsubscribe();
    sub.unsubscribe();
    assert!(!sub.is_active());
    assert_eq!(sub.next().await, None);
  }
}
