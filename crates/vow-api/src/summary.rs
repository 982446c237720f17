//! Read-only aggregate endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/summary` | Countdown and statistics as of now |
//! | `GET`  | `/budget/breakdown` | Per-category totals, largest estimate first |

use std::sync::Arc;

use axum::{Json, extract::State};
use chrono::Utc;
use vow_core::{
  checklist::ChecklistItem,
  expense::Expense,
  guest::Guest,
  stats::{CategoryTotal, category_breakdown},
  store::PlannerStore,
  summary::HomeSummary,
  task::Task,
};

use crate::{
  error::{ApiError, store_error},
  owner::Owner,
};

/// `GET /summary`
pub async fn home<S: PlannerStore>(
  State(store): State<Arc<S>>,
  Owner(owner): Owner,
) -> Result<Json<HomeSummary>, ApiError> {
  let (plan, tasks, guests, expenses, checklist) = tokio::try_join!(
    store.get_plan(owner.clone()),
    store.list::<Task>(owner.clone()),
    store.list::<Guest>(owner.clone()),
    store.list::<Expense>(owner.clone()),
    store.list::<ChecklistItem>(owner),
  )
  .map_err(store_error)?;

  Ok(Json(HomeSummary::compute(
    plan.as_ref(),
    &tasks,
    &guests,
    &expenses,
    &checklist,
    Utc::now(),
  )))
}

/// `GET /budget/breakdown`
pub async fn breakdown<S: PlannerStore>(
  State(store): State<Arc<S>>,
  Owner(owner): Owner,
) -> Result<Json<Vec<CategoryTotal>>, ApiError> {
  let expenses = store.list::<Expense>(owner).await.map_err(store_error)?;
  Ok(Json(category_breakdown(&expenses)))
}
