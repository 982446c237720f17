//! The identity-provider boundary.
//!
//! Login, registration and session handling belong to an external provider.
//! The planner only needs to know who the current user is, so that every
//! store call can be scoped to their [`OwnerId`].

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::document::OwnerId;

/// The currently authenticated user, as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
  pub uid:          String,
  pub display_name: Option<String>,
  pub email:        Option<String>,
  pub photo_url:    Option<String>,
}

impl CurrentUser {
  pub fn owner_id(&self) -> OwnerId { OwnerId::new(self.uid.clone()) }
}

/// Sign-up form payload. Checked locally before it is handed to a provider.
#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
  pub name:             String,
  pub email:            String,
  pub password:         String,
  pub confirm_password: String,
}

/// Sign-in form payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
  pub email:    String,
  pub password: String,
}

/// Resolves presented credentials to a user.
///
/// Implemented by the server (HTTP Basic over configured argon2 hashes) and by
/// test doubles.
pub trait IdentityProvider: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Returns `None` when the credentials do not identify a user.
  fn authenticate(
    &self,
    credentials: Credentials,
  ) -> impl Future<Output = Result<Option<CurrentUser>, Self::Error>> + Send + '_;
}
