//! The `PlannerStore` trait: the collection synchronisation boundary.
//!
//! The trait is implemented by storage backends (e.g. `vow-store-sqlite`).
//! Higher layers (`vow-api`, `vow-server`) and the aggregator depend on this
//! abstraction and receive a store handle explicitly; there is no ambient
//! global client.

use std::future::Future;

use uuid::Uuid;

use crate::{
  document::{Document, OwnerId},
  plan::{PlanInput, WeddingPlan},
  subscription::Subscription,
};

/// Failures a [`PlannerStore`] reports.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// The operation named a document that does not exist.
  fn is_not_found(&self) -> bool;
}

/// Abstraction over a document store holding wedding plans and the four
/// owner-scoped collections.
///
/// Writes are fire-and-forget from the store's perspective: there is no retry,
/// and a failed write leaves stored state unchanged.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait PlannerStore: Send + Sync {
  type Error: StoreError;

  // ── Wedding plan ──────────────────────────────────────────────────────

  /// The owner's plan, or `None` if setup has not been completed.
  fn get_plan(
    &self,
    owner: OwnerId,
  ) -> impl Future<Output = Result<Option<WeddingPlan>, Self::Error>> + Send + '_;

  /// Create or overwrite the owner's plan. The first save stamps
  /// `created_at`; every save stamps `updated_at`.
  fn save_plan(
    &self,
    owner: OwnerId,
    input: PlanInput,
  ) -> impl Future<Output = Result<WeddingPlan, Self::Error>> + Send + '_;

  /// Follow the owner's plan. Each snapshot holds zero or one plan.
  fn subscribe_plan(
    &self,
    owner: OwnerId,
  ) -> impl Future<Output = Result<Subscription<WeddingPlan>, Self::Error>> + Send + '_;

  // ── Collections ───────────────────────────────────────────────────────

  /// Persist a new document. The store assigns its id and `created_at`.
  fn add<D: Document>(
    &self,
    owner: OwnerId,
    input: D::New,
  ) -> impl Future<Output = Result<D, Self::Error>> + Send + '_;

  /// Retrieve a document by id. Returns `None` if not found.
  fn get<D: Document>(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<D>, Self::Error>> + Send + '_;

  /// Merge `patch` into the stored document and stamp `updated_at`.
  ///
  /// Returns an error if no document with `id` exists.
  fn update<D: Document>(
    &self,
    id: Uuid,
    patch: D::Patch,
  ) -> impl Future<Output = Result<D, Self::Error>> + Send + '_;

  /// Remove a document. Removing an unknown or already-removed id succeeds
  /// without effect. Nothing cascades.
  fn delete<D: Document>(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// The owner's whole collection, sorted by [`Document::snapshot_order`].
  fn list<D: Document>(
    &self,
    owner: OwnerId,
  ) -> impl Future<Output = Result<Vec<D>, Self::Error>> + Send + '_;

  /// Follow the owner's collection. The first snapshot is delivered
  /// immediately; a new one follows every add, update or delete.
  ///
  /// Fails if the initial load fails.
  fn subscribe<D: Document>(
    &self,
    owner: OwnerId,
  ) -> impl Future<Output = Result<Subscription<D>, Self::Error>> + Send + '_;
}
