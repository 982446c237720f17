//! JSON REST API for Vow.
//!
//! Exposes an axum [`Router`] backed by any [`vow_core::store::PlannerStore`].
//! Every route acts on behalf of the [`vow_core::identity::CurrentUser`]
//! found in the request extensions; resolving that user (and TLS, and
//! transport) is the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", vow_api::api_router(store.clone()))
//! ```

pub mod collections;
pub mod error;
pub mod extract;
pub mod owner;
pub mod plan;
pub mod summary;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, patch},
};
use vow_core::{
  checklist::ChecklistItem, expense::Expense, guest::Guest, store::PlannerStore,
  task::Task,
};

pub use collections::Resource;
pub use error::ApiError;
pub use owner::Owner;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: PlannerStore + 'static,
{
  let router = Router::new()
    // Plan
    .route("/plan", get(plan::get_one::<S>).put(plan::save::<S>))
    // Aggregates
    .route("/summary", get(summary::home::<S>))
    .route("/budget/breakdown", get(summary::breakdown::<S>));

  let router = collection_routes::<S, Task>(router, "/tasks");
  let router = collection_routes::<S, Guest>(router, "/guests");
  let router = collection_routes::<S, Expense>(router, "/expenses");
  let router = collection_routes::<S, ChecklistItem>(router, "/checklist");

  router.with_state(store)
}

fn collection_routes<S, D>(router: Router<Arc<S>>, path: &str) -> Router<Arc<S>>
where
  S: PlannerStore + 'static,
  D: Resource,
{
  router
    .route(
      path,
      get(collections::list::<S, D>).post(collections::create::<S, D>),
    )
    .route(
      &format!("{path}/{{id}}"),
      patch(collections::update::<S, D>).delete(collections::delete::<S, D>),
    )
}
