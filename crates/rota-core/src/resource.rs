//! Bookable resources — the fixed rooms and the dynamic-entity registry.
//!
//! A schedule entry targets exactly one [`Resource`]. The room set is closed;
//! everything else (VIP rooms, committees, equipment) is registered at runtime
//! as a [`DynamicEntity`] and addressed by id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Rooms ───────────────────────────────────────────────────────────────────

/// The fixed rooms of the organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Room {
  /// The principal's office.
  Office,
  ConferenceHall,
  Auditorium,
}

impl Room {
  /// Human-readable name, as shown on calendars and in error messages.
  pub fn display_name(&self) -> &'static str {
    match self {
      Room::Office => "Principal's Office",
      Room::ConferenceHall => "Conference Hall",
      Room::Auditorium => "Auditorium",
    }
  }
}

impl std::fmt::Display for Room {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.display_name())
  }
}

// ─── Resource ────────────────────────────────────────────────────────────────

/// A resolved booking target: one of the fixed rooms, or a dynamic entity by
/// id. Exactly one — the variants are the mutual exclusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Resource {
  Room(Room),
  Entity(Uuid),
}

impl std::fmt::Display for Resource {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Resource::Room(room) => write!(f, "{room}"),
      Resource::Entity(id) => write!(f, "entity {id}"),
    }
  }
}

/// A [`Resource`] plus, for entities, the current manager assignment.
/// Produced by resolution, consumed by the authorization policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedResource {
  pub resource: Resource,
  /// The managing user of a dynamic entity, if one is assigned.
  /// Always `None` for rooms.
  pub manager:  Option<Uuid>,
}

impl ResolvedResource {
  pub fn room(room: Room) -> Self {
    Self { resource: Resource::Room(room), manager: None }
  }
}

// ─── Booking target ──────────────────────────────────────────────────────────

/// The raw resource reference as it arrives in a request: two optional
/// fields, of which exactly one must be set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingTarget {
  pub room:      Option<Room>,
  pub entity_id: Option<Uuid>,
}

impl BookingTarget {
  pub fn room(room: Room) -> Self {
    Self { room: Some(room), entity_id: None }
  }

  pub fn entity(id: Uuid) -> Self {
    Self { room: None, entity_id: Some(id) }
  }

  /// Collapse into a [`Resource`]. Both-set and neither-set are validation
  /// errors, never a silent default.
  pub fn as_resource(&self) -> Result<Resource> {
    match (self.room, self.entity_id) {
      (Some(room), None) => Ok(Resource::Room(room)),
      (None, Some(id)) => Ok(Resource::Entity(id)),
      _ => Err(Error::AmbiguousResource),
    }
  }
}

// ─── Dynamic entities ────────────────────────────────────────────────────────

/// A runtime-registered bookable target beyond the fixed room set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DynamicEntity {
  pub id:         Uuid,
  pub name:       String,
  /// Free-text category label, e.g. "VIP Room" or "Committee".
  pub kind_label: String,
  /// The user responsible for this entity's schedule, if any.
  pub manager:    Option<Uuid>,
  pub created_at: DateTime<Utc>,
}

/// Input for creating or replacing a [`DynamicEntity`] record.
/// `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewDynamicEntity {
  pub name:       String,
  pub kind_label: String,
  pub manager:    Option<Uuid>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn target_with_room_resolves() {
    let target = BookingTarget::room(Room::Auditorium);
    assert_eq!(
      target.as_resource().unwrap(),
      Resource::Room(Room::Auditorium)
    );
  }

  #[test]
  fn target_with_entity_resolves() {
    let id = Uuid::new_v4();
    let target = BookingTarget::entity(id);
    assert_eq!(target.as_resource().unwrap(), Resource::Entity(id));
  }

  #[test]
  fn target_with_both_is_ambiguous() {
    let target = BookingTarget {
      room:      Some(Room::Office),
      entity_id: Some(Uuid::new_v4()),
    };
    assert!(matches!(
      target.as_resource(),
      Err(Error::AmbiguousResource)
    ));
  }

  #[test]
  fn target_with_neither_is_ambiguous() {
    let target = BookingTarget::default();
    assert!(matches!(
      target.as_resource(),
      Err(Error::AmbiguousResource)
    ));
  }

  #[test]
  fn room_booking_never_equals_entity_booking() {
    let id = Uuid::new_v4();
    assert_ne!(Resource::Room(Room::Office), Resource::Entity(id));
  }
}
