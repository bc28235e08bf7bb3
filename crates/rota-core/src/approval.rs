//! The approval resolver — the decision core of the engine.
//!
//! Given the overlap result, the actor's role, the explicit force flag, and
//! (for edits) the entry's prior approval state, decide whether the write is
//! allowed at all and what approval state the entry ends up in. The rules are
//! asymmetric per role and must behave identically for creation and edits.

use crate::{actor::Role, entry::ScheduleEntry};

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Everything the resolver looks at. Pure data; the resolver itself does no
/// I/O.
#[derive(Debug)]
pub struct ApprovalContext<'a> {
  pub role:     Role,
  /// Approved entries overlapping the candidate interval, from the overlap
  /// detector.
  pub overlaps: &'a [ScheduleEntry],
  /// Explicit caller intent to book despite a known conflict.
  pub force:    bool,
  /// The entry's approval state before this write; `None` on create.
  pub prior_approved:     Option<bool>,
  /// Explicit client intent for the approval flag, if any was sent.
  pub requested_approved: Option<bool>,
}

// ─── Outputs ─────────────────────────────────────────────────────────────────

/// How an allowed write came out, for the caller-facing outcome message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
  /// No overlap; nothing to resolve.
  Clear,
  /// A superadmin's booking won over an existing overlap. The overlap is
  /// surfaced as a warning, never hidden.
  OverlapOverridden,
  /// The write succeeded but the entry is parked unapproved until a human
  /// resolves the conflict.
  PendingApproval,
  /// `force = true` knowingly co-booked a conflicting slot.
  ForcedDespiteOverlap,
}

impl Outcome {
  /// Human-readable outcome line. `verb` is "created" or "updated".
  pub fn message(&self, verb: &str) -> String {
    match self {
      Outcome::Clear => format!("Schedule entry {verb} successfully."),
      Outcome::OverlapOverridden => {
        format!("Entry {verb}; warning: it overlaps existing approved entries.")
      }
      Outcome::PendingApproval => {
        format!("Entry {verb}, pending approval due to conflict.")
      }
      Outcome::ForcedDespiteOverlap => {
        format!("Entry {verb} despite overlapping existing entries (forced).")
      }
    }
  }
}

/// The resolver's verdict on a single write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
  Allow { approved: bool, outcome: Outcome },
  /// The write is refused outright: an admin may not put an entry into the
  /// approved (conflict-counting) state while a live conflict exists.
  Reject,
}

// ─── Resolution ──────────────────────────────────────────────────────────────

/// Apply the decision table.
///
/// Rule order matters: an empty overlap set short-circuits everything
/// (including `force`), and `force` beats the role split.
pub fn resolve(ctx: &ApprovalContext<'_>) -> Decision {
  // No conflict: honor the caller's explicit intent, default to approved.
  // This is also the only path that promotes a pending entry — its conflict
  // has to be gone by the time it is edited again.
  if ctx.overlaps.is_empty() {
    return Decision::Allow {
      approved: ctx.requested_approved.unwrap_or(true),
      outcome:  Outcome::Clear,
    };
  }

  // Explicit, logged intent to co-book a conflicting slot, any role.
  if ctx.force {
    return Decision::Allow {
      approved: true,
      outcome:  Outcome::ForcedDespiteOverlap,
    };
  }

  // A superadmin's booking always wins and is approved immediately; the
  // overlap is reported alongside the success, not hidden.
  if ctx.role == Role::Superadmin {
    return Decision::Allow {
      approved: true,
      outcome:  Outcome::OverlapOverridden,
    };
  }

  // Admin with a live conflict. Asking to approve an edited entry while the
  // conflict persists is the one refused write; everything else is parked
  // (or stays parked) as pending. An approved entry moved into a conflict
  // drops back to pending — keeping it approved would break the non-overlap
  // invariant.
  match (ctx.prior_approved, ctx.requested_approved) {
    (Some(_), Some(true)) => Decision::Reject,
    _ => Decision::Allow {
      approved: false,
      outcome:  Outcome::PendingApproval,
    },
  }
}

#[cfg(test)]
mod tests {
  use chrono::{NaiveDate, NaiveTime};
  use uuid::Uuid;

  use super::*;
  use crate::{
    entry::EntryStatus,
    resource::{Resource, Room},
  };

  fn existing_entry() -> ScheduleEntry {
    ScheduleEntry {
      id:           Uuid::new_v4(),
      title:        "Budget Review".into(),
      kind:         "meeting".into(),
      status:       EntryStatus::Confirmed,
      color:        None,
      description:  None,
      meeting_with: None,
      location:     None,
      date:         NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
      start_time:   NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
      end_time:     NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
      resource:     Resource::Room(Room::Office),
      approved:     true,
      created_by:   None,
    }
  }

  fn ctx<'a>(
    role: Role,
    overlaps: &'a [ScheduleEntry],
    force: bool,
    prior: Option<bool>,
    requested: Option<bool>,
  ) -> ApprovalContext<'a> {
    ApprovalContext {
      role,
      overlaps,
      force,
      prior_approved: prior,
      requested_approved: requested,
    }
  }

  // ── Rule 1: empty overlap set ─────────────────────────────────────────

  #[test]
  fn no_conflict_defaults_to_approved() {
    let decision = resolve(&ctx(Role::Admin, &[], false, None, None));
    assert_eq!(
      decision,
      Decision::Allow { approved: true, outcome: Outcome::Clear }
    );
  }

  #[test]
  fn no_conflict_honors_explicit_unapproved_request() {
    let decision = resolve(&ctx(Role::Admin, &[], false, None, Some(false)));
    assert_eq!(
      decision,
      Decision::Allow { approved: false, outcome: Outcome::Clear }
    );
  }

  #[test]
  fn pending_entry_promotes_once_conflict_is_gone() {
    // Edit of a pending entry after the conflicting booking was removed:
    // no explicit request, empty overlap set — promotion happens here and
    // only here.
    let decision = resolve(&ctx(Role::Admin, &[], false, Some(false), None));
    assert_eq!(
      decision,
      Decision::Allow { approved: true, outcome: Outcome::Clear }
    );
  }

  #[test]
  fn force_without_conflict_is_an_ordinary_write() {
    let decision = resolve(&ctx(Role::Admin, &[], true, None, None));
    assert_eq!(
      decision,
      Decision::Allow { approved: true, outcome: Outcome::Clear }
    );
  }

  // ── Rule 3: force beats the role split ────────────────────────────────

  #[test]
  fn admin_force_wins_with_approved_result() {
    let overlaps = vec![existing_entry()];
    let decision = resolve(&ctx(Role::Admin, &overlaps, true, None, None));
    assert_eq!(
      decision,
      Decision::Allow {
        approved: true,
        outcome:  Outcome::ForcedDespiteOverlap,
      }
    );
  }

  #[test]
  fn superadmin_force_reports_the_force_not_the_override() {
    let overlaps = vec![existing_entry()];
    let decision = resolve(&ctx(Role::Superadmin, &overlaps, true, None, None));
    assert_eq!(
      decision,
      Decision::Allow {
        approved: true,
        outcome:  Outcome::ForcedDespiteOverlap,
      }
    );
  }

  #[test]
  fn force_overrides_even_an_explicit_approval_request_on_edit() {
    let overlaps = vec![existing_entry()];
    let decision =
      resolve(&ctx(Role::Admin, &overlaps, true, Some(false), Some(true)));
    assert_eq!(
      decision,
      Decision::Allow {
        approved: true,
        outcome:  Outcome::ForcedDespiteOverlap,
      }
    );
  }

  // ── Rule 2: superadmin override ───────────────────────────────────────

  #[test]
  fn superadmin_booking_wins_with_warning() {
    let overlaps = vec![existing_entry()];
    let decision =
      resolve(&ctx(Role::Superadmin, &overlaps, false, None, None));
    assert_eq!(
      decision,
      Decision::Allow {
        approved: true,
        outcome:  Outcome::OverlapOverridden,
      }
    );
  }

  // ── Rule 2: admin paths ───────────────────────────────────────────────

  #[test]
  fn admin_create_with_conflict_is_parked_pending() {
    let overlaps = vec![existing_entry()];
    let decision = resolve(&ctx(Role::Admin, &overlaps, false, None, None));
    assert_eq!(
      decision,
      Decision::Allow {
        approved: false,
        outcome:  Outcome::PendingApproval,
      }
    );
  }

  #[test]
  fn admin_create_requesting_approval_is_still_parked() {
    // Creation never rejects; the explicit request is overridden to pending.
    let overlaps = vec![existing_entry()];
    let decision =
      resolve(&ctx(Role::Admin, &overlaps, false, None, Some(true)));
    assert_eq!(
      decision,
      Decision::Allow {
        approved: false,
        outcome:  Outcome::PendingApproval,
      }
    );
  }

  #[test]
  fn admin_edit_requesting_approval_over_live_conflict_rejects() {
    let overlaps = vec![existing_entry()];
    let decision =
      resolve(&ctx(Role::Admin, &overlaps, false, Some(false), Some(true)));
    assert_eq!(decision, Decision::Reject);
  }

  #[test]
  fn admin_edit_of_pending_entry_stays_pending_without_request() {
    let overlaps = vec![existing_entry()];
    let decision =
      resolve(&ctx(Role::Admin, &overlaps, false, Some(false), None));
    assert_eq!(
      decision,
      Decision::Allow {
        approved: false,
        outcome:  Outcome::PendingApproval,
      }
    );
  }

  #[test]
  fn admin_edit_moving_approved_entry_into_conflict_demotes_it() {
    let overlaps = vec![existing_entry()];
    let decision =
      resolve(&ctx(Role::Admin, &overlaps, false, Some(true), None));
    assert_eq!(
      decision,
      Decision::Allow {
        approved: false,
        outcome:  Outcome::PendingApproval,
      }
    );
  }

  #[test]
  fn admin_edit_explicitly_unapproving_is_allowed() {
    let overlaps = vec![existing_entry()];
    let decision =
      resolve(&ctx(Role::Admin, &overlaps, false, Some(true), Some(false)));
    assert_eq!(
      decision,
      Decision::Allow {
        approved: false,
        outcome:  Outcome::PendingApproval,
      }
    );
  }

  #[test]
  fn superadmin_edit_requesting_approval_over_conflict_succeeds() {
    // The reject row is admin-only.
    let overlaps = vec![existing_entry()];
    let decision = resolve(&ctx(
      Role::Superadmin,
      &overlaps,
      false,
      Some(false),
      Some(true),
    ));
    assert_eq!(
      decision,
      Decision::Allow {
        approved: true,
        outcome:  Outcome::OverlapOverridden,
      }
    );
  }
}
