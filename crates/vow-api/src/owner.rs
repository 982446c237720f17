//! The [`Owner`] extractor: the authenticated user every route is scoped to.

use axum::{extract::FromRequestParts, http::request::Parts};
use vow_core::{document::OwnerId, identity::CurrentUser};

use crate::error::ApiError;

/// The owner id of the [`CurrentUser`] placed in request extensions by the
/// surrounding identity layer. Rejects with 401 when there is none.
#[derive(Debug, Clone)]
pub struct Owner(pub OwnerId);

impl<S: Send + Sync> FromRequestParts<S> for Owner {
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &S,
  ) -> Result<Self, Self::Rejection> {
    parts
      .extensions
      .get::<CurrentUser>()
      .map(|user| Owner(user.owner_id()))
      .ok_or(ApiError::Unauthorized)
  }
}
