//! Error type for `vow-store-sqlite`.

use thiserror::Error;
use vow_core::{document::Collection, store::StoreError};

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] vow_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  /// Attempted to update a document that does not exist.
  #[error("{collection} document not found: {id}")]
  DocumentNotFound {
    collection: Collection,
    id:         uuid::Uuid,
  },
}

impl StoreError for Error {
  fn is_not_found(&self) -> bool { matches!(self, Self::DocumentNotFound { .. }) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
