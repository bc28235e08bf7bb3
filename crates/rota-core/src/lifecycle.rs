//! The reservation lifecycle — orchestration of create, update, and delete.
//!
//! Every write runs the same gauntlet: field validation, resource
//! resolution, the authorization policy, the overlap detector, and the
//! approval resolver, in that order. Validation and authorization failures
//! happen strictly before any persistence call, so a refused request has no
//! side effects.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  actor::Actor,
  approval::{self, ApprovalContext, Decision, Outcome},
  entry::{EntryRequest, ScheduleEntry},
  overlap,
  policy,
  resource::{BookingTarget, ResolvedResource, Resource},
  store::ScheduleStore,
};

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// A successful write: the persisted entry plus how the approval resolution
/// came out. [`Outcome::message`] renders the human-readable line.
#[derive(Debug, Clone)]
pub struct WriteOutcome {
  pub entry:   ScheduleEntry,
  pub outcome: Outcome,
}

// ─── Scheduler ───────────────────────────────────────────────────────────────

/// The write-path engine over a [`ScheduleStore`].
///
/// The overlap read and the subsequent persist must be atomic with respect
/// to other writers on the same resource/date; a single write-path mutex
/// serializes them. Display reads never take the lock.
pub struct Scheduler<S> {
  store:      Arc<S>,
  write_lock: tokio::sync::Mutex<()>,
}

impl<S: ScheduleStore> Scheduler<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self { store, write_lock: tokio::sync::Mutex::new(()) }
  }

  /// Resolve a request's booking target, consulting the registry for a
  /// dynamic entity's manager assignment. An unknown entity id is a
  /// validation failure: the request named a resource that does not exist.
  async fn resolve_target(
    &self,
    target: &BookingTarget,
  ) -> Result<ResolvedResource> {
    let resource = target.as_resource()?;
    let manager = match resource {
      Resource::Room(_) => None,
      Resource::Entity(id) => {
        let entity = self
          .store
          .get_entity(id)
          .await
          .map_err(Error::store)?
          .ok_or_else(|| {
            Error::Validation(format!("unknown dynamic entity: {id}"))
          })?;
        entity.manager
      }
    };
    Ok(ResolvedResource { resource, manager })
  }

  /// Resolve the resource an existing entry is already booked against.
  async fn resolve_current(
    &self,
    resource: Resource,
  ) -> Result<ResolvedResource> {
    let manager = match resource {
      Resource::Room(_) => None,
      Resource::Entity(id) => self
        .store
        .get_entity(id)
        .await
        .map_err(Error::store)?
        .and_then(|e| e.manager),
    };
    Ok(ResolvedResource { resource, manager })
  }

  fn authorize(
    actor: &Actor,
    resource: &ResolvedResource,
  ) -> Result<()> {
    if policy::can_write(actor, resource) {
      Ok(())
    } else {
      Err(Error::Unauthorized { resource: resource.resource.to_string() })
    }
  }

  // ── Create ────────────────────────────────────────────────────────────

  pub async fn create(
    &self,
    request: EntryRequest,
    actor: &Actor,
  ) -> Result<WriteOutcome> {
    request.validate()?;
    let resolved = self.resolve_target(&request.target).await?;
    Self::authorize(actor, &resolved)?;

    // Overlap check and persist are atomic with respect to other writers.
    let _guard = self.write_lock.lock().await;
    let conflicts = overlap::find_overlaps(
      &*self.store,
      resolved.resource,
      request.date,
      request.start_time,
      request.end_time,
      None,
    )
    .await?;

    let decision = approval::resolve(&ApprovalContext {
      role:               actor.role,
      overlaps:           &conflicts,
      force:              request.force,
      prior_approved:     None,
      requested_approved: request.approved,
    });

    let (approved, outcome) = match decision {
      Decision::Allow { approved, outcome } => (approved, outcome),
      Decision::Reject => return Err(Error::Conflict { conflicts }),
    };

    let entry = ScheduleEntry {
      id:           Uuid::new_v4(),
      title:        request.title,
      kind:         request.kind,
      status:       request.status,
      color:        request.color,
      description:  request.description,
      meeting_with: request.meeting_with,
      location:     request.location,
      date:         request.date,
      start_time:   request.start_time,
      end_time:     request.end_time,
      resource:     resolved.resource,
      approved,
      created_by:   Some(actor.user_id),
    };

    self
      .store
      .insert_entry(entry.clone())
      .await
      .map_err(Error::store)?;

    log_outcome("created", &entry, outcome, conflicts.len());
    Ok(WriteOutcome { entry, outcome })
  }

  // ── Update ────────────────────────────────────────────────────────────

  pub async fn update(
    &self,
    id: Uuid,
    request: EntryRequest,
    actor: &Actor,
  ) -> Result<WriteOutcome> {
    request.validate()?;

    let existing = self
      .store
      .get_entry(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::EntryNotFound(id))?;

    let new_resolved = self.resolve_target(&request.target).await?;

    // Authorization is checked against the entry's current resource; when
    // the request moves the entry, the new resource must be writable too.
    let current_resolved = self.resolve_current(existing.resource).await?;
    Self::authorize(actor, &current_resolved)?;
    if new_resolved.resource != existing.resource {
      Self::authorize(actor, &new_resolved)?;
    }

    // Only re-run the conflict check when the temporal or resource fields
    // change, or when the entry is currently pending — a pending entry is
    // re-evaluated on every edit, since its conflict may have since been
    // resolved.
    let needs_recheck = !existing.approved
      || existing.date != request.date
      || existing.start_time != request.start_time
      || existing.end_time != request.end_time
      || existing.resource != new_resolved.resource;

    let _guard = self.write_lock.lock().await;
    let (approved, outcome, conflict_count) = if needs_recheck {
      let conflicts = overlap::find_overlaps(
        &*self.store,
        new_resolved.resource,
        request.date,
        request.start_time,
        request.end_time,
        Some(id),
      )
      .await?;

      let decision = approval::resolve(&ApprovalContext {
        role:               actor.role,
        overlaps:           &conflicts,
        force:              request.force,
        prior_approved:     Some(existing.approved),
        requested_approved: request.approved,
      });

      match decision {
        Decision::Allow { approved, outcome } => {
          (approved, outcome, conflicts.len())
        }
        Decision::Reject => return Err(Error::Conflict { conflicts }),
      }
    } else {
      // Descriptive-only edit of an approved entry. An explicit request can
      // still demote it; it cannot conflict with anything it didn't already
      // not conflict with.
      (request.approved.unwrap_or(existing.approved), Outcome::Clear, 0)
    };

    let entry = ScheduleEntry {
      id,
      title:        request.title,
      kind:         request.kind,
      status:       request.status,
      color:        request.color,
      description:  request.description,
      meeting_with: request.meeting_with,
      location:     request.location,
      date:         request.date,
      start_time:   request.start_time,
      end_time:     request.end_time,
      resource:     new_resolved.resource,
      approved,
      created_by:   existing.created_by,
    };

    self
      .store
      .update_entry(entry.clone())
      .await
      .map_err(Error::store)?;

    log_outcome("updated", &entry, outcome, conflict_count);
    Ok(WriteOutcome { entry, outcome })
  }

  // ── Delete ────────────────────────────────────────────────────────────

  /// Deletion is immediate and final, subject to the same authorization
  /// check as edits. It never touches the approval state of other entries:
  /// removing a conflict source does not retroactively promote the entries
  /// that were pending because of it.
  pub async fn delete(&self, id: Uuid, actor: &Actor) -> Result<()> {
    let existing = self
      .store
      .get_entry(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::EntryNotFound(id))?;

    let resolved = self.resolve_current(existing.resource).await?;
    Self::authorize(actor, &resolved)?;

    self.store.delete_entry(id).await.map_err(Error::store)?;
    info!(entry = %id, resource = %existing.resource, "schedule entry deleted");
    Ok(())
  }
}

fn log_outcome(
  verb: &str,
  entry: &ScheduleEntry,
  outcome: Outcome,
  conflict_count: usize,
) {
  match outcome {
    Outcome::Clear => {
      info!(entry = %entry.id, resource = %entry.resource, "schedule entry {verb}");
    }
    Outcome::PendingApproval => {
      info!(
        entry = %entry.id,
        resource = %entry.resource,
        conflicts = conflict_count,
        "schedule entry {verb} as pending"
      );
    }
    Outcome::OverlapOverridden => {
      warn!(
        entry = %entry.id,
        resource = %entry.resource,
        conflicts = conflict_count,
        "schedule entry {verb} over an existing overlap"
      );
    }
    Outcome::ForcedDespiteOverlap => {
      warn!(
        entry = %entry.id,
        resource = %entry.resource,
        conflicts = conflict_count,
        "schedule entry force-{verb} despite overlap"
      );
    }
  }
}
