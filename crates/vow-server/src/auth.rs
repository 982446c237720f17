//! HTTP Basic identity provider over configured argon2 hashes.

use std::{convert::Infallible, sync::Arc};

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{
  extract::{Request, State},
  http::HeaderMap,
  middleware::Next,
  response::Response,
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use rand_core::OsRng;
use serde::Deserialize;
use vow_core::{
  identity::{Credentials, CurrentUser, IdentityProvider},
  validate::Validate,
};

use crate::error::Error;

/// One account allowed to sign in, as listed in the configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UserConfig {
  /// Stable id; becomes the owner id of everything the user creates.
  pub uid:           String,
  pub email:         String,
  #[serde(default)]
  pub display_name:  Option<String>,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// Hash `password` into a PHC string suitable for [`UserConfig::password_hash`].
pub fn hash_password(password: &str) -> Result<String, Error> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| Error::Hash(e.to_string()))
}

/// Resolves e-mail and password pairs against the configured users.
pub struct BasicAuthProvider {
  users: Vec<UserConfig>,
}

impl BasicAuthProvider {
  pub fn new(users: Vec<UserConfig>) -> Self { Self { users } }
}

impl IdentityProvider for BasicAuthProvider {
  type Error = Infallible;

  async fn authenticate(
    &self,
    credentials: Credentials,
  ) -> Result<Option<CurrentUser>, Infallible> {
    let Ok(credentials) = credentials.validate() else {
      return Ok(None);
    };
    let Some(user) = self
      .users
      .iter()
      .find(|u| u.email.eq_ignore_ascii_case(&credentials.email))
    else {
      return Ok(None);
    };

    let Ok(parsed_hash) = PasswordHash::new(&user.password_hash) else {
      tracing::warn!(uid = %user.uid, "configured password hash is not a PHC string");
      return Ok(None);
    };
    if Argon2::default()
      .verify_password(credentials.password.as_bytes(), &parsed_hash)
      .is_err()
    {
      return Ok(None);
    }

    Ok(Some(CurrentUser {
      uid:          user.uid.clone(),
      display_name: user.display_name.clone(),
      email:        Some(user.email.clone()),
      photo_url:    None,
    }))
  }
}

/// Read `Authorization: Basic …` into credentials. The Basic user name is the
/// e-mail address.
pub fn basic_credentials(headers: &HeaderMap) -> Result<Credentials, Error> {
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(Error::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(Error::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| Error::Unauthorized)?;
  let creds   = std::str::from_utf8(&decoded).map_err(|_| Error::Unauthorized)?;

  let (email, password) = creds.split_once(':').ok_or(Error::Unauthorized)?;

  Ok(Credentials {
    email:    email.to_owned(),
    password: password.to_owned(),
  })
}

/// Middleware: resolve the caller through `identity` and attach the
/// [`CurrentUser`] to the request, or answer 401.
pub async fn require_user<I>(
  State(identity): State<Arc<I>>,
  mut req: Request,
  next: Next,
) -> Result<Response, Error>
where
  I: IdentityProvider + 'static,
{
  let credentials = basic_credentials(req.headers())?;
  let user = identity
    .authenticate(credentials)
    .await
    .map_err(|e| {
      tracing::warn!(error = %e, "identity provider failed");
      Error::Unauthorized
    })?
    .ok_or(Error::Unauthorized)?;

  tracing::debug!(uid = %user.uid, "authenticated");
  req.extensions_mut().insert(user);
  Ok(next.run(req).await)
}
