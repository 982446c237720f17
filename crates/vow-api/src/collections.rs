//! Handlers shared by the four owner-scoped collections.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/{collection}` | Filters as query parameters |
//! | `POST`   | `/{collection}` | Body: the new-document input |
//! | `PATCH`  | `/{collection}/:id` | Body: partial update; 404 if not the caller's |
//! | `DELETE` | `/{collection}/:id` | Always 204 |

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;
use vow_core::{
  checklist::ChecklistItem,
  document::{Document, OwnerId},
  expense::Expense,
  filter::{ChecklistFilter, ExpenseFilter, GuestFilter, TaskFilter},
  guest::Guest,
  store::PlannerStore,
  task::Task,
  validate::Validate,
};

use crate::{
  error::{ApiError, store_error},
  extract::{JsonBody, PathParam, QueryParams},
  owner::Owner,
};

// ─── Resource ────────────────────────────────────────────────────────────────

/// A document kind served over HTTP: its inputs arrive as JSON and are
/// validated before reaching the store, and its list accepts a filter.
pub trait Resource:
  Document<New: DeserializeOwned + Validate, Patch: DeserializeOwned + Validate>
{
  type Filter: DeserializeOwned + Send + 'static;

  fn keep(filter: &Self::Filter, doc: &Self) -> bool;
}

impl Resource for Task {
  type Filter = TaskFilter;

  fn keep(filter: &TaskFilter, doc: &Self) -> bool { filter.matches(doc) }
}

impl Resource for Guest {
  type Filter = GuestFilter;

  fn keep(filter: &GuestFilter, doc: &Self) -> bool { filter.matches(doc) }
}

impl Resource for Expense {
  type Filter = ExpenseFilter;

  fn keep(filter: &ExpenseFilter, doc: &Self) -> bool { filter.matches(doc) }
}

impl Resource for ChecklistItem {
  type Filter = ChecklistFilter;

  fn keep(filter: &ChecklistFilter, doc: &Self) -> bool { filter.matches(doc) }
}

/// Fetch `id` if it exists and belongs to `owner`.
async fn owned<S, D>(store: &S, owner: &OwnerId, id: Uuid) -> Result<Option<D>, ApiError>
where
  S: PlannerStore,
  D: Resource,
{
  let doc = store.get::<D>(id).await.map_err(store_error)?;
  Ok(doc.filter(|d| &d.meta().owner_id == owner))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /{collection}[?filter…]`
pub async fn list<S, D>(
  State(store): State<Arc<S>>,
  Owner(owner): Owner,
  QueryParams(filter): QueryParams<D::Filter>,
) -> Result<Json<Vec<D>>, ApiError>
where
  S: PlannerStore,
  D: Resource,
{
  let docs = store.list::<D>(owner).await.map_err(store_error)?;
  Ok(Json(docs.into_iter().filter(|d| D::keep(&filter, d)).collect()))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /{collection}`
pub async fn create<S, D>(
  State(store): State<Arc<S>>,
  Owner(owner): Owner,
  JsonBody(input): JsonBody<D::New>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PlannerStore,
  D: Resource,
{
  let input = input.validate()?;
  let doc = store.add::<D>(owner, input).await.map_err(store_error)?;
  Ok((StatusCode::CREATED, Json(doc)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PATCH /{collection}/:id`
pub async fn update<S, D>(
  State(store): State<Arc<S>>,
  Owner(owner): Owner,
  PathParam(id): PathParam<Uuid>,
  JsonBody(patch): JsonBody<D::Patch>,
) -> Result<Json<D>, ApiError>
where
  S: PlannerStore,
  D: Resource,
{
  let patch = patch.validate()?;
  if owned::<S, D>(&store, &owner, id).await?.is_none() {
    return Err(ApiError::NotFound(format!("{} document {id} not found", D::COLLECTION)));
  }
  let doc = store.update::<D>(id, patch).await.map_err(store_error)?;
  Ok(Json(doc))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /{collection}/:id`. Another owner's document is treated as absent.
pub async fn delete<S, D>(
  State(store): State<Arc<S>>,
  Owner(owner): Owner,
  PathParam(id): PathParam<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: PlannerStore,
  D: Resource,
{
  if owned::<S, D>(&store, &owner, id).await?.is_some() {
    store.delete::<D>(id).await.map_err(store_error)?;
  }
  Ok(StatusCode::NO_CONTENT)
}
