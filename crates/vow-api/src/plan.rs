//! Handlers for `/plan`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/plan` | 404 until setup has been completed |
//! | `PUT`  | `/plan` | Create or overwrite; `created_at` survives re-saves |

use std::sync::Arc;

use axum::{Json, extract::State};
use vow_core::{
  plan::{PlanInput, WeddingPlan},
  store::PlannerStore,
  validate::Validate,
};

use crate::{
  error::{ApiError, store_error},
  extract::JsonBody,
  owner::Owner,
};

/// `GET /plan`
pub async fn get_one<S: PlannerStore>(
  State(store): State<Arc<S>>,
  Owner(owner): Owner,
) -> Result<Json<WeddingPlan>, ApiError> {
  let plan = store
    .get_plan(owner)
    .await
    .map_err(store_error)?
    .ok_or_else(|| ApiError::NotFound("no wedding plan yet".into()))?;
  Ok(Json(plan))
}

/// `PUT /plan`
pub async fn save<S: PlannerStore>(
  State(store): State<Arc<S>>,
  Owner(owner): Owner,
  JsonBody(input): JsonBody<PlanInput>,
) -> Result<Json<WeddingPlan>, ApiError> {
  let input = input.validate()?;
  let plan = store.save_plan(owner, input).await.map_err(store_error)?;
  Ok(Json(plan))
}
