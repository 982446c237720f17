//! The `Document` trait shared by every owner-scoped collection entity.
//!
//! A document is a record in one of the four planner collections. The store
//! assigns its id and creation timestamp; callers only ever supply a
//! `New` payload (on add) or a `Patch` (on update).

use std::{cmp::Ordering, fmt};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::Result;

// ─── Owner ───────────────────────────────────────────────────────────────────

/// The identifier used to scope every query to a single user's records.
///
/// Opaque: it is whatever uid the identity provider hands out.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
  pub fn new(uid: impl Into<String>) -> Self { Self(uid.into()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for OwnerId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for OwnerId {
  fn from(s: &str) -> Self { Self(s.to_owned()) }
}

impl From<String> for OwnerId {
  fn from(s: String) -> Self { Self(s) }
}

// ─── Collections ─────────────────────────────────────────────────────────────

/// The owner-scoped collections held by the document store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
  Tasks,
  Guests,
  Expenses,
  ChecklistItems,
}

impl Collection {
  pub const ALL: [Collection; 4] = [
    Collection::Tasks,
    Collection::Guests,
    Collection::Expenses,
    Collection::ChecklistItems,
  ];

  /// The persisted collection (table) name.
  pub fn name(self) -> &'static str {
    match self {
      Self::Tasks => "tasks",
      Self::Guests => "guests",
      Self::Expenses => "expenses",
      Self::ChecklistItems => "checklist_items",
    }
  }
}

impl fmt::Display for Collection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

// ─── Document ────────────────────────────────────────────────────────────────

/// Store-assigned identity and timestamps carried by every document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
  pub id:         Uuid,
  pub owner_id:   OwnerId,
  pub created_at: DateTime<Utc>,
  /// Stamped on every partial update; absent until the first one.
  #[serde(default)]
  pub updated_at: Option<DateTime<Utc>>,
}

/// A record in one of the owner-scoped collections.
pub trait Document:
  Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
  /// Input accepted by the store's add operation.
  type New: fmt::Debug + Send + 'static;
  /// Partial-field update; unset fields are left untouched.
  type Patch: fmt::Debug + Send + 'static;

  const COLLECTION: Collection;

  /// Build the stored document from store-assigned metadata and the caller's
  /// input, applying add-time defaults (e.g. `completed = false`).
  fn create(meta: DocumentMeta, input: Self::New) -> Self;

  fn meta(&self) -> &DocumentMeta;

  fn meta_mut(&mut self) -> &mut DocumentMeta;

  /// Merge the set fields of `patch` into `self`.
  fn apply(&mut self, patch: Self::Patch);

  /// Snapshot ordering for this collection.
  fn snapshot_order(a: &Self, b: &Self) -> Ordering;

  fn id(&self) -> Uuid { self.meta().id }

  /// Sort a snapshot in place. Stable, so equal keys keep store order.
  fn sort_snapshot(items: &mut [Self]) { items.sort_by(Self::snapshot_order); }

  fn to_json(&self) -> Result<String> { Ok(serde_json::to_string(self)?) }

  fn from_json(s: &str) -> Result<Self> { Ok(serde_json::from_str(s)?) }
}

// ─── Serde helpers ───────────────────────────────────────────────────────────

/// Deserialise a field as `Some(inner)` whenever it is present, so that with
/// `#[serde(default)]` a missing key is `None`, an explicit `null` is
/// `Some(None)` (clear) and a value is `Some(Some(v))` (set).
pub(crate) fn present<'de, D, T>(d: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  Option::<T>::deserialize(d).map(Some)
}

/// Trim `s`, mapping an empty result to `None`.
pub(crate) fn non_empty(s: &str) -> Option<String> {
  let trimmed = s.trim();
  (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
