//! Handlers for `/entries` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/entries` | Public calendar feed; optional `date`, `kind`, `room`, `entity_id` |
//! | `GET`    | `/entries/:id` | Public; 404 if not found |
//! | `POST`   | `/entries` | Auth; body: [`EntryBody`]; returns 201 + entry + outcome message |
//! | `PUT`    | `/entries/:id` | Auth; same body |
//! | `DELETE` | `/entries/:id` | Auth |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{NaiveDate, NaiveTime};
use rota_core::{
  Error as CoreError,
  entry::{EntryRequest, EntryStatus, ScheduleEntry},
  resource::{BookingTarget, Resource, Room},
  store::{EntryFilter, ScheduleStore},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, auth::AuthedActor, error::ApiError};

// ─── Shared params ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub date:      Option<NaiveDate>,
  pub kind:      Option<String>,
  pub room:      Option<Room>,
  pub entity_id: Option<Uuid>,
}

impl ListParams {
  /// Fold the optional room/entity pair into a resource filter. Naming both
  /// is rejected the same way it is on writes.
  pub fn resource(&self) -> Result<Option<Resource>, ApiError> {
    match (self.room, self.entity_id) {
      (None, None) => Ok(None),
      _ => {
        let target = BookingTarget {
          room:      self.room,
          entity_id: self.entity_id,
        };
        Ok(Some(target.as_resource()?))
      }
    }
  }

  pub fn filter(&self) -> Result<EntryFilter, ApiError> {
    Ok(EntryFilter {
      date:     self.date,
      kind:     self.kind.clone(),
      resource: self.resource()?,
    })
  }
}

// ─── List / get ──────────────────────────────────────────────────────────────

/// `GET /entries[?date=...][&kind=...][&room=...|&entity_id=...]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<ScheduleEntry>>, ApiError>
where
  S: ScheduleStore + Clone + Send + Sync + 'static,
{
  let entries = state
    .store
    .list_entries(params.filter()?)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(entries))
}

/// `GET /entries/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<ScheduleEntry>, ApiError>
where
  S: ScheduleStore + Clone + Send + Sync + 'static,
{
  let entry = state
    .store
    .get_entry(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or(CoreError::EntryNotFound(id))?;
  Ok(Json(entry))
}

// ─── Write bodies ────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /entries` and `PUT /entries/:id`.
#[derive(Debug, Deserialize)]
pub struct EntryBody {
  pub title:        String,
  pub kind:         String,
  pub status:       EntryStatus,
  pub color:        Option<String>,
  pub description:  Option<String>,
  pub meeting_with: Option<String>,
  pub location:     Option<String>,
  pub date:         NaiveDate,
  pub start_time:   NaiveTime,
  pub end_time:     NaiveTime,
  pub room:         Option<Room>,
  pub entity_id:    Option<Uuid>,
  /// Explicit approval intent; omitted means "engine decides".
  pub approved:     Option<bool>,
  /// Knowingly book over a conflicting slot.
  #[serde(default)]
  pub force:        bool,
}

impl From<EntryBody> for EntryRequest {
  fn from(b: EntryBody) -> Self {
    EntryRequest {
      title:        b.title,
      kind:         b.kind,
      status:       b.status,
      color:        b.color,
      description:  b.description,
      meeting_with: b.meeting_with,
      location:     b.location,
      date:         b.date,
      start_time:   b.start_time,
      end_time:     b.end_time,
      target:       BookingTarget { room: b.room, entity_id: b.entity_id },
      approved:     b.approved,
      force:        b.force,
    }
  }
}

/// The persisted entry plus the human-readable outcome line.
#[derive(Debug, Serialize)]
pub struct WriteResponse {
  pub entry:   ScheduleEntry,
  pub message: String,
}

// ─── Create / update / delete ────────────────────────────────────────────────

/// `POST /entries` — returns 201 + [`WriteResponse`].
pub async fn create<S>(
  State(state): State<AppState<S>>,
  AuthedActor(actor): AuthedActor,
  Json(body): Json<EntryBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ScheduleStore + Clone + Send + Sync + 'static,
{
  let out = state.scheduler.create(EntryRequest::from(body), &actor).await?;
  Ok((
    StatusCode::CREATED,
    Json(WriteResponse {
      message: out.outcome.message("created"),
      entry:   out.entry,
    }),
  ))
}

/// `PUT /entries/:id`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  AuthedActor(actor): AuthedActor,
  Path(id): Path<Uuid>,
  Json(body): Json<EntryBody>,
) -> Result<Json<WriteResponse>, ApiError>
where
  S: ScheduleStore + Clone + Send + Sync + 'static,
{
  let out = state
    .scheduler
    .update(id, EntryRequest::from(body), &actor)
    .await?;
  Ok(Json(WriteResponse {
    message: out.outcome.message("updated"),
    entry:   out.entry,
  }))
}

/// `DELETE /entries/:id`
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  AuthedActor(actor): AuthedActor,
  Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: ScheduleStore + Clone + Send + Sync + 'static,
{
  state.scheduler.delete(id, &actor).await?;
  Ok(Json(serde_json::json!({ "success": true })))
}
