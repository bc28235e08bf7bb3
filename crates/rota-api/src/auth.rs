//! HTTP Basic-auth extractor resolving credentials to an [`Actor`].
//!
//! Credentials are verified against the users table with argon2. The
//! resolved actor carries the account's role and capability flags; a
//! superadmin's capability set is expanded to all flags at this boundary.

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use argon2::password_hash::SaltString;
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use rand_core::OsRng;
use rota_core::{actor::Actor, store::ScheduleStore};

use crate::{AppState, error::ApiError};

/// Present in a handler's arguments means the request was authenticated.
pub struct AuthedActor(pub Actor);

/// Verify a Basic-auth header against the users table.
pub async fn verify_basic<S: ScheduleStore>(
  headers: &HeaderMap,
  store: &S,
) -> Result<Actor, ApiError> {
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(ApiError::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(ApiError::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| ApiError::Unauthorized)?;
  let creds = std::str::from_utf8(&decoded).map_err(|_| ApiError::Unauthorized)?;

  let (username, password) =
    creds.split_once(':').ok_or(ApiError::Unauthorized)?;

  let user = store
    .get_user_by_username(username)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or(ApiError::Unauthorized)?;

  let parsed_hash = PasswordHash::new(&user.password_hash)
    .map_err(|_| ApiError::Unauthorized)?;

  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| ApiError::Unauthorized)?;

  Ok(user.actor())
}

impl<S> FromRequestParts<AppState<S>> for AuthedActor
where
  S: ScheduleStore + Clone + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let actor = verify_basic(&parts.headers, &*state.store).await?;
    Ok(AuthedActor(actor))
  }
}

/// Gate for the registry and account-management endpoints.
pub fn require_superadmin(actor: &Actor) -> Result<(), ApiError> {
  if actor.is_superadmin() {
    Ok(())
  } else {
    Err(ApiError::Forbidden("superadmin access required".into()))
  }
}

/// Produce an argon2 PHC string for a new password.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| ApiError::Store(format!("argon2 error: {e}").into()))
}
