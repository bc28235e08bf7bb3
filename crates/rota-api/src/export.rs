//! CSV export of the calendar feed.
//!
//! `GET /export[?date=...][&room=...|&entity_id=...]` — authenticated.
//! Streams the matching entries as an attachment with a dated filename.

use std::collections::HashMap;

use axum::{
  extract::{Query, State},
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use rota_core::{resource::Resource, store::ScheduleStore};
use uuid::Uuid;

use crate::{
  AppState,
  auth::AuthedActor,
  entries::ListParams,
  error::ApiError,
};

const HEADERS: [&str; 9] = [
  "Date",
  "Start Time",
  "End Time",
  "Title",
  "Type",
  "Status",
  "Resource",
  "Meeting With",
  "Approved",
];

/// `GET /export`
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  AuthedActor(_actor): AuthedActor,
  Query(params): Query<ListParams>,
) -> Result<Response, ApiError>
where
  S: ScheduleStore + Clone + Send + Sync + 'static,
{
  let entries = state
    .store
    .list_entries(params.filter()?)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  // Entity names for the Resource column.
  let entity_names: HashMap<Uuid, String> = state
    .store
    .list_entities()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .into_iter()
    .map(|e| (e.id, e.name))
    .collect();

  let mut writer = csv::Writer::from_writer(Vec::new());
  writer
    .write_record(HEADERS)
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  for entry in &entries {
    let resource = match entry.resource {
      Resource::Room(room) => room.display_name().to_owned(),
      Resource::Entity(id) => entity_names
        .get(&id)
        .cloned()
        .unwrap_or_else(|| format!("entity {id}")),
    };
    writer
      .write_record([
        entry.date.to_string(),
        entry.start_time.format("%H:%M").to_string(),
        entry.end_time.format("%H:%M").to_string(),
        entry.title.clone(),
        entry.kind.clone(),
        format!("{:?}", entry.status).to_lowercase(),
        resource,
        entry.meeting_with.clone().unwrap_or_default(),
        if entry.approved { "yes" } else { "no" }.to_owned(),
      ])
      .map_err(|e| ApiError::Store(Box::new(e)))?;
  }

  let data = writer
    .into_inner()
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let filename = match params.date {
    Some(date) => format!("rota-export-{date}.csv"),
    None => "rota-export-all.csv".to_owned(),
  };

  let mut res = (StatusCode::OK, data).into_response();
  res.headers_mut().insert(
    header::CONTENT_TYPE,
    HeaderValue::from_static("text/csv; charset=utf-8"),
  );
  res.headers_mut().insert(
    header::CONTENT_DISPOSITION,
    HeaderValue::from_str(&format!("attachment; filename=\"{filename}\""))
      .map_err(|e| ApiError::Store(Box::new(e)))?,
  );
  Ok(res)
}
