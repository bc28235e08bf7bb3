//! Error types for `rota-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::entry::ScheduleEntry;

#[derive(Debug, Error)]
pub enum Error {
  /// Malformed or missing input. Raised before any store access; a request
  /// that fails validation has no side effects.
  #[error("invalid request: {0}")]
  Validation(String),

  /// A booking named both a room and a dynamic entity, or neither.
  #[error("a booking must target exactly one of a room or a dynamic entity")]
  AmbiguousResource,

  #[error("start time must be strictly before end time")]
  InvalidTimeRange,

  /// The actor may not write to this resource's schedule.
  #[error("not authorized to modify the schedule for {resource}")]
  Unauthorized { resource: String },

  #[error("schedule entry not found: {0}")]
  EntryNotFound(Uuid),

  #[error("dynamic entity not found: {0}")]
  EntityNotFound(Uuid),

  #[error("user not found: {0}")]
  UserNotFound(Uuid),

  #[error("username already taken: {0}")]
  DuplicateUsername(String),

  /// A dynamic entity cannot be deleted while schedule entries still
  /// reference it.
  #[error("dynamic entity {0} still has schedule entries")]
  EntityInUse(Uuid),

  /// The overlap/role/force combination disallows the write. Carries the
  /// overlapping entries so callers can render them.
  #[error("cannot approve an entry that still causes an overlap")]
  Conflict { conflicts: Vec<ScheduleEntry> },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a storage backend error.
  pub fn store<E: std::error::Error + Send + Sync + 'static>(e: E) -> Self {
    Error::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
