//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use rota_core::entry::ScheduleEntry;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// Missing or bad credentials.
  #[error("unauthorized")]
  Unauthorized,

  /// Authenticated, but not allowed to do this.
  #[error("forbidden: {0}")]
  Forbidden(String),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  /// The write was refused because of a live overlap. Carries the
  /// conflicting entries for the client to render.
  #[error("conflict: {message}")]
  Conflict {
    message:   String,
    conflicts: Vec<ScheduleEntry>,
  },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<rota_core::Error> for ApiError {
  fn from(e: rota_core::Error) -> Self {
    use rota_core::Error as E;
    match e {
      E::Validation(_) | E::AmbiguousResource | E::InvalidTimeRange => {
        ApiError::BadRequest(e.to_string())
      }
      E::DuplicateUsername(_) => ApiError::BadRequest(e.to_string()),
      E::Unauthorized { .. } => ApiError::Forbidden(e.to_string()),
      E::EntryNotFound(_) | E::EntityNotFound(_) | E::UserNotFound(_) => {
        ApiError::NotFound(e.to_string())
      }
      E::EntityInUse(_) => ApiError::Conflict {
        message:   e.to_string(),
        conflicts: Vec::new(),
      },
      E::Conflict { conflicts } => ApiError::Conflict {
        message: "cannot approve an entry that still causes an overlap".into(),
        conflicts,
      },
      E::Store(inner) => ApiError::Store(inner),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::Unauthorized => {
        let mut res = (
          StatusCode::UNAUTHORIZED,
          Json(json!({ "error": "unauthorized" })),
        )
          .into_response();
        res.headers_mut().insert(
          header::WWW_AUTHENTICATE,
          HeaderValue::from_static("Basic realm=\"rota\""),
        );
        res
      }
      ApiError::Forbidden(m) => {
        (StatusCode::FORBIDDEN, Json(json!({ "error": m }))).into_response()
      }
      ApiError::NotFound(m) => {
        (StatusCode::NOT_FOUND, Json(json!({ "error": m }))).into_response()
      }
      ApiError::BadRequest(m) => {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": m }))).into_response()
      }
      ApiError::Conflict { message, conflicts } => (
        StatusCode::CONFLICT,
        Json(json!({ "error": message, "conflicts": conflicts })),
      )
        .into_response(),
      ApiError::Store(e) => (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": e.to_string() })),
      )
        .into_response(),
    }
  }
}
