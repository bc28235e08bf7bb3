//! Handlers for `/users` — account management.
//!
//! All endpoints are superadmin-only. Superadmin accounts themselves are
//! off-limits over the API: they cannot be minted, edited, or deleted here,
//! and only their own password can be reset.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use rota_core::{
  Error as CoreError,
  actor::{Capabilities, NewUser, Role, User},
  store::ScheduleStore,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::{
  AppState,
  auth::{AuthedActor, hash_password, require_superadmin},
  error::ApiError,
};

// ─── View ────────────────────────────────────────────────────────────────────

/// Account record as returned over the API — never includes the hash.
#[derive(Debug, Serialize)]
pub struct UserView {
  pub id:           Uuid,
  pub username:     String,
  pub role:         Role,
  pub capabilities: Capabilities,
}

impl From<User> for UserView {
  fn from(u: User) -> Self {
    Self {
      id:           u.id,
      username:     u.username,
      role:         u.role,
      capabilities: u.capabilities,
    }
  }
}

// ─── List / get ──────────────────────────────────────────────────────────────

/// `GET /users`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  AuthedActor(actor): AuthedActor,
) -> Result<Json<Vec<UserView>>, ApiError>
where
  S: ScheduleStore + Clone + Send + Sync + 'static,
{
  require_superadmin(&actor)?;
  let users = state
    .store
    .list_users()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(users.into_iter().map(UserView::from).collect()))
}

/// `GET /users/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  AuthedActor(actor): AuthedActor,
  Path(id): Path<Uuid>,
) -> Result<Json<UserView>, ApiError>
where
  S: ScheduleStore + Clone + Send + Sync + 'static,
{
  require_superadmin(&actor)?;
  let user = fetch(&state, id).await?;
  Ok(Json(UserView::from(user)))
}

async fn fetch<S>(state: &AppState<S>, id: Uuid) -> Result<User, ApiError>
where
  S: ScheduleStore,
{
  state
    .store
    .get_user(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| CoreError::UserNotFound(id).into())
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateUserBody {
  pub username:     String,
  pub password:     String,
  pub role:         Role,
  #[serde(default)]
  pub capabilities: Capabilities,
}

/// `POST /users` — returns 201 + [`UserView`].
pub async fn create<S>(
  State(state): State<AppState<S>>,
  AuthedActor(actor): AuthedActor,
  Json(body): Json<CreateUserBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ScheduleStore + Clone + Send + Sync + 'static,
{
  require_superadmin(&actor)?;

  if body.username.trim().is_empty() || body.password.is_empty() {
    return Err(ApiError::BadRequest(
      "username and password are required".into(),
    ));
  }
  // Superadmins are seeded at deployment, never minted over the API.
  if body.role != Role::Admin {
    return Err(ApiError::BadRequest("can only create admin users".into()));
  }
  if state
    .store
    .get_user_by_username(&body.username)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .is_some()
  {
    return Err(CoreError::DuplicateUsername(body.username).into());
  }

  let user = state
    .store
    .create_user(NewUser {
      username:      body.username,
      password_hash: hash_password(&body.password)?,
      role:          body.role,
      capabilities:  body.capabilities,
    })
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok((StatusCode::CREATED, Json(UserView::from(user))))
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// Partial update: absent fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateUserBody {
  pub username:     Option<String>,
  pub role:         Option<Role>,
  pub capabilities: Option<Capabilities>,
}

/// `PUT /users/:id`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  AuthedActor(actor): AuthedActor,
  Path(id): Path<Uuid>,
  Json(body): Json<UpdateUserBody>,
) -> Result<Json<UserView>, ApiError>
where
  S: ScheduleStore + Clone + Send + Sync + 'static,
{
  require_superadmin(&actor)?;
  let mut user = fetch(&state, id).await?;

  if user.role == Role::Superadmin {
    return Err(ApiError::Forbidden("cannot update superadmin users".into()));
  }
  if matches!(body.role, Some(Role::Superadmin)) {
    return Err(ApiError::BadRequest("can only set role to admin".into()));
  }

  if let Some(username) = body.username {
    if username.trim().is_empty() {
      return Err(ApiError::BadRequest("username must not be empty".into()));
    }
    if username != user.username
      && state
        .store
        .get_user_by_username(&username)
        .await
        .map_err(|e| ApiError::Store(Box::new(e)))?
        .is_some()
    {
      return Err(CoreError::DuplicateUsername(username).into());
    }
    user.username = username;
  }
  if let Some(capabilities) = body.capabilities {
    user.capabilities = capabilities;
  }

  state
    .store
    .update_user(user.clone())
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(UserView::from(user)))
}

// ─── Reset password ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ResetPasswordBody {
  pub password: String,
}

/// `POST /users/:id/reset-password`
pub async fn reset_password<S>(
  State(state): State<AppState<S>>,
  AuthedActor(actor): AuthedActor,
  Path(id): Path<Uuid>,
  Json(body): Json<ResetPasswordBody>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: ScheduleStore + Clone + Send + Sync + 'static,
{
  require_superadmin(&actor)?;
  if body.password.is_empty() {
    return Err(ApiError::BadRequest("password is required".into()));
  }

  let user = fetch(&state, id).await?;
  // A superadmin may reset their own password, but not another superadmin's.
  if user.role == Role::Superadmin && user.id != actor.user_id {
    return Err(ApiError::Forbidden(
      "superadmins cannot modify other superadmins".into(),
    ));
  }

  state
    .store
    .set_password_hash(id, hash_password(&body.password)?)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(json!({ "message": "password reset successfully" })))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /users/:id`
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  AuthedActor(actor): AuthedActor,
  Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: ScheduleStore + Clone + Send + Sync + 'static,
{
  require_superadmin(&actor)?;
  let user = fetch(&state, id).await?;

  if user.role == Role::Superadmin {
    return Err(ApiError::Forbidden("cannot delete superadmin users".into()));
  }

  state
    .store
    .delete_user(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(json!({ "message": "user deleted successfully" })))
}
