//! The overlap detector.
//!
//! Intervals are half-open `[start, end)`: an entry ending at 10:00 and one
//! starting at 10:00 are adjacent, not conflicting. Only approved entries on
//! the exact same resource and date participate — a room booking never
//! conflicts with a dynamic-entity booking.

use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use crate::{
  Error, Result,
  entry::ScheduleEntry,
  resource::Resource,
  store::ScheduleStore,
};

/// Half-open interval overlap test.
pub fn overlaps(
  s1: NaiveTime,
  e1: NaiveTime,
  s2: NaiveTime,
  e2: NaiveTime,
) -> bool {
  s1 < e2 && e1 > s2
}

/// All approved entries on `resource`/`date` whose time range overlaps
/// `[start, end)`, excluding `exclude` (supplied on edits to avoid
/// self-conflict).
///
/// Returns the full entries, not a boolean — the approval resolver and the
/// caller-facing conflict error both need their details.
pub async fn find_overlaps<S: ScheduleStore>(
  store: &S,
  resource: Resource,
  date: NaiveDate,
  start: NaiveTime,
  end: NaiveTime,
  exclude: Option<Uuid>,
) -> Result<Vec<ScheduleEntry>> {
  let candidates = store
    .query_conflict_candidates(resource, date, exclude)
    .await
    .map_err(Error::store)?;

  Ok(
    candidates
      .into_iter()
      .filter(|e| overlaps(start, end, e.start_time, e.end_time))
      .collect(),
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
  }

  #[test]
  fn partial_overlap_detected() {
    assert!(overlaps(t(9, 0), t(10, 0), t(9, 30), t(10, 30)));
    assert!(overlaps(t(9, 30), t(10, 30), t(9, 0), t(10, 0)));
  }

  #[test]
  fn containment_detected() {
    assert!(overlaps(t(9, 0), t(12, 0), t(10, 0), t(11, 0)));
    assert!(overlaps(t(10, 0), t(11, 0), t(9, 0), t(12, 0)));
  }

  #[test]
  fn identical_intervals_overlap() {
    assert!(overlaps(t(9, 0), t(10, 0), t(9, 0), t(10, 0)));
  }

  #[test]
  fn touching_endpoints_are_adjacent() {
    assert!(!overlaps(t(10, 0), t(11, 0), t(11, 0), t(12, 0)));
    assert!(!overlaps(t(11, 0), t(12, 0), t(10, 0), t(11, 0)));
  }

  #[test]
  fn disjoint_intervals_do_not_overlap() {
    assert!(!overlaps(t(8, 0), t(9, 0), t(14, 0), t(15, 0)));
  }

  #[test]
  fn one_minute_overlap_detected() {
    assert!(overlaps(t(9, 0), t(10, 1), t(10, 0), t(11, 0)));
  }
}
