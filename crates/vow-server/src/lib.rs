//! HTTP server wiring for Vow.
//!
//! Mounts [`vow_api::api_router`] under `/api` behind an identity layer that
//! resolves HTTP Basic credentials to a [`vow_core::identity::CurrentUser`].

pub mod auth;
pub mod error;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, middleware};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use vow_core::{identity::IdentityProvider, store::PlannerStore};

use auth::UserConfig;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and `VOW_*`
/// environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  #[serde(default)]
  pub users:      Vec<UserConfig>,
}

// ─── Application state ────────────────────────────────────────────────────────

/// The handles the server is built from. Both are injected; nothing is global.
pub struct AppState<S, I> {
  pub store:    Arc<S>,
  pub identity: Arc<I>,
}

impl<S, I> Clone for AppState<S, I> {
  fn clone(&self) -> Self {
    Self {
      store:    Arc::clone(&self.store),
      identity: Arc::clone(&self.identity),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the server's [`Router`].
pub fn router<S, I>(state: AppState<S, I>) -> Router
where
  S: PlannerStore + 'static,
  I: IdentityProvider + 'static,
{
  let api = vow_api::api_router(state.store).route_layer(
    middleware::from_fn_with_state(state.identity, auth::require_user::<I>),
  );

  Router::new()
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────
