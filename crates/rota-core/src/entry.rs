//! Schedule entries — the reservation records.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  resource::{BookingTarget, Resource},
};

// ─── Status ──────────────────────────────────────────────────────────────────

/// Scheduling intent. This describes what the booker means by the entry, not
/// whether it passed conflict detection — that is the `approved` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
  Confirmed,
  Tentative,
  Cancelled,
}

// ─── ScheduleEntry ───────────────────────────────────────────────────────────

/// A persisted reservation.
///
/// Only entries with `approved = true` count toward overlap detection for
/// their resource and date; `approved = false` entries are visible but inert
/// ("pending") until a later edit re-evaluates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEntry {
  pub id:           Uuid,
  pub title:        String,
  /// Free-text category: "meeting", "appointment", "event", "unavailable", …
  pub kind:         String,
  pub status:       EntryStatus,
  pub color:        Option<String>,
  pub description:  Option<String>,
  pub meeting_with: Option<String>,
  /// Free-text location detail, e.g. a seat block within the auditorium.
  pub location:     Option<String>,
  pub date:         NaiveDate,
  pub start_time:   NaiveTime,
  pub end_time:     NaiveTime,
  pub resource:     Resource,
  pub approved:     bool,
  /// `None` for legacy and system-seeded entries.
  pub created_by:   Option<Uuid>,
}

// ─── EntryRequest ────────────────────────────────────────────────────────────

/// Input to [`crate::lifecycle::Scheduler::create`] and
/// [`crate::lifecycle::Scheduler::update`]. `id` and `created_by` are never
/// accepted from callers.
#[derive(Debug, Clone)]
pub struct EntryRequest {
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
  pub target:       BookingTarget,
  /// Explicit client intent for the approval flag, if any.
  pub approved:     Option<bool>,
  /// Knowingly book over a conflicting slot (e.g. for an emergency).
  pub force:        bool,
}

impl EntryRequest {
  /// Field-level validation: required text fields, the strict time-range
  /// invariant, and the exactly-one resource target. Runs before any
  /// authorization or overlap check.
  pub fn validate(&self) -> Result<Resource> {
    if self.title.trim().is_empty() {
      return Err(Error::Validation("title is required".into()));
    }
    if self.kind.trim().is_empty() {
      return Err(Error::Validation("entry kind is required".into()));
    }
    if self.start_time >= self.end_time {
      return Err(Error::InvalidTimeRange);
    }
    self.target.as_resource()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::resource::Room;

  fn request() -> EntryRequest {
    EntryRequest {
      title:        "Faculty Meeting".into(),
      kind:         "meeting".into(),
      status:       EntryStatus::Confirmed,
      color:        None,
      description:  None,
      meeting_with: None,
      location:     None,
      date:         NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
      start_time:   NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
      end_time:     NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
      target:       BookingTarget::room(Room::ConferenceHall),
      approved:     None,
      force:        false,
    }
  }

  #[test]
  fn valid_request_passes() {
    assert_eq!(
      request().validate().unwrap(),
      Resource::Room(Room::ConferenceHall)
    );
  }

  #[test]
  fn empty_title_rejected() {
    let mut req = request();
    req.title = "   ".into();
    assert!(matches!(req.validate(), Err(Error::Validation(_))));
  }

  #[test]
  fn empty_kind_rejected() {
    let mut req = request();
    req.kind = String::new();
    assert!(matches!(req.validate(), Err(Error::Validation(_))));
  }

  #[test]
  fn zero_length_interval_rejected() {
    let mut req = request();
    req.end_time = req.start_time;
    assert!(matches!(req.validate(), Err(Error::InvalidTimeRange)));
  }

  #[test]
  fn inverted_interval_rejected() {
    let mut req = request();
    req.start_time = NaiveTime::from_hms_opt(11, 0, 0).unwrap();
    assert!(matches!(req.validate(), Err(Error::InvalidTimeRange)));
  }

  #[test]
  fn ambiguous_target_rejected_during_validation() {
    let mut req = request();
    req.target = BookingTarget::default();
    assert!(matches!(req.validate(), Err(Error::AmbiguousResource)));
  }
}
