//! Handlers for `/entities` — the dynamic-entity registry.
//!
//! All endpoints are superadmin-only. Registry records are plain CRUD; the
//! only rule with teeth is that an entity still referenced by schedule
//! entries cannot be deleted.

use std::collections::HashMap;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{DateTime, Utc};
use rota_core::{
  Error as CoreError,
  resource::{DynamicEntity, NewDynamicEntity},
  store::ScheduleStore,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  AppState,
  auth::{AuthedActor, require_superadmin},
  error::ApiError,
};

// ─── Views ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ManagerInfo {
  pub id:       Uuid,
  pub username: String,
}

/// Registry record with the manager's username joined in.
#[derive(Debug, Serialize)]
pub struct EntityView {
  pub id:         Uuid,
  pub name:       String,
  pub kind_label: String,
  pub manager:    Option<ManagerInfo>,
  pub created_at: DateTime<Utc>,
}

impl EntityView {
  fn assemble(
    entity: DynamicEntity,
    usernames: &HashMap<Uuid, String>,
  ) -> Self {
    let manager = entity.manager.map(|id| ManagerInfo {
      id,
      username: usernames.get(&id).cloned().unwrap_or_default(),
    });
    Self {
      id: entity.id,
      name: entity.name,
      kind_label: entity.kind_label,
      manager,
      created_at: entity.created_at,
    }
  }
}

async fn manager_usernames<S>(
  state: &AppState<S>,
) -> Result<HashMap<Uuid, String>, ApiError>
where
  S: ScheduleStore,
{
  Ok(
    state
      .store
      .list_users()
      .await
      .map_err(|e| ApiError::Store(Box::new(e)))?
      .into_iter()
      .map(|u| (u.id, u.username))
      .collect(),
  )
}

// ─── Bodies ──────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /entities` and `PUT /entities/:id`.
#[derive(Debug, Deserialize)]
pub struct EntityBody {
  pub name:       String,
  pub kind_label: String,
  pub manager_id: Option<Uuid>,
}

impl EntityBody {
  fn validate(&self) -> Result<(), ApiError> {
    if self.name.trim().is_empty() || self.kind_label.trim().is_empty() {
      return Err(ApiError::BadRequest(
        "name and kind label are required".into(),
      ));
    }
    Ok(())
  }
}

/// The manager, if named, must be an existing account.
async fn check_manager<S>(
  state: &AppState<S>,
  manager_id: Option<Uuid>,
) -> Result<(), ApiError>
where
  S: ScheduleStore,
{
  if let Some(id) = manager_id {
    state
      .store
      .get_user(id)
      .await
      .map_err(|e| ApiError::Store(Box::new(e)))?
      .ok_or_else(|| ApiError::BadRequest("invalid manager id".into()))?;
  }
  Ok(())
}

// ─── Handlers ────────────────────────────────────────────────────────────────

/// `GET /entities`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  AuthedActor(actor): AuthedActor,
) -> Result<Json<Vec<EntityView>>, ApiError>
where
  S: ScheduleStore + Clone + Send + Sync + 'static,
{
  require_superadmin(&actor)?;
  let usernames = manager_usernames(&state).await?;
  let entities = state
    .store
    .list_entities()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(
    entities
      .into_iter()
      .map(|e| EntityView::assemble(e, &usernames))
      .collect(),
  ))
}

/// `GET /entities/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  AuthedActor(actor): AuthedActor,
  Path(id): Path<Uuid>,
) -> Result<Json<EntityView>, ApiError>
where
  S: ScheduleStore + Clone + Send + Sync + 'static,
{
  require_superadmin(&actor)?;
  let entity = state
    .store
    .get_entity(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or(CoreError::EntityNotFound(id))?;
  let usernames = manager_usernames(&state).await?;
  Ok(Json(EntityView::assemble(entity, &usernames)))
}

/// `POST /entities` — returns 201 + [`EntityView`].
pub async fn create<S>(
  State(state): State<AppState<S>>,
  AuthedActor(actor): AuthedActor,
  Json(body): Json<EntityBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ScheduleStore + Clone + Send + Sync + 'static,
{
  require_superadmin(&actor)?;
  body.validate()?;
  check_manager(&state, body.manager_id).await?;

  let entity = state
    .store
    .create_entity(NewDynamicEntity {
      name:       body.name,
      kind_label: body.kind_label,
      manager:    body.manager_id,
    })
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let usernames = manager_usernames(&state).await?;
  Ok((
    StatusCode::CREATED,
    Json(EntityView::assemble(entity, &usernames)),
  ))
}

/// `PUT /entities/:id`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  AuthedActor(actor): AuthedActor,
  Path(id): Path<Uuid>,
  Json(body): Json<EntityBody>,
) -> Result<Json<EntityView>, ApiError>
where
  S: ScheduleStore + Clone + Send + Sync + 'static,
{
  require_superadmin(&actor)?;
  body.validate()?;
  check_manager(&state, body.manager_id).await?;

  let existing = state
    .store
    .get_entity(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or(CoreError::EntityNotFound(id))?;

  let entity = DynamicEntity {
    id,
    name: body.name,
    kind_label: body.kind_label,
    manager: body.manager_id,
    created_at: existing.created_at,
  };
  state
    .store
    .update_entity(entity.clone())
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let usernames = manager_usernames(&state).await?;
  Ok(Json(EntityView::assemble(entity, &usernames)))
}

/// `DELETE /entities/:id` — refused while schedule entries still reference
/// the entity; returns 204 otherwise.
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  AuthedActor(actor): AuthedActor,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: ScheduleStore + Clone + Send + Sync + 'static,
{
  require_superadmin(&actor)?;

  state
    .store
    .get_entity(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or(CoreError::EntityNotFound(id))?;

  let references = state
    .store
    .entity_entry_count(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  if references > 0 {
    return Err(CoreError::EntityInUse(id).into());
  }

  state
    .store
    .delete_entity(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(StatusCode::NO_CONTENT)
}
