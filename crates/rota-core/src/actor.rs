//! Actors, roles, and capability flags.
//!
//! The engine never manages sessions; the API layer authenticates a request
//! and hands the engine an [`Actor`] snapshot of the caller's identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Role ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  /// Scoped writer; what they may touch is governed by [`Capabilities`].
  Admin,
  /// Global authority. Holds every capability implicitly.
  Superadmin,
}

// ─── Capabilities ────────────────────────────────────────────────────────────

/// The named per-resource editing rights an admin can hold. One flag per
/// fixed room, plus the global dynamic-entity right.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(default)]
pub struct Capabilities {
  /// May write to the principal's office schedule.
  pub edit_principal_schedule: bool,
  pub manage_conference_hall:  bool,
  pub manage_auditorium:       bool,
  /// May write to any dynamic entity's schedule, managed or not.
  pub manage_dynamic_entities: bool,
}

impl Capabilities {
  /// Every flag set; what a superadmin effectively holds.
  pub fn all() -> Self {
    Self {
      edit_principal_schedule: true,
      manage_conference_hall:  true,
      manage_auditorium:       true,
      manage_dynamic_entities: true,
    }
  }
}

// ─── Actor ───────────────────────────────────────────────────────────────────

/// The authenticated caller of a single request. Not persisted by the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
  pub user_id:      Uuid,
  pub role:         Role,
  pub capabilities: Capabilities,
}

impl Actor {
  pub fn is_superadmin(&self) -> bool {
    self.role == Role::Superadmin
  }
}

// ─── User accounts ───────────────────────────────────────────────────────────

/// A stored account. The password hash is an argon2 PHC string and never
/// leaves the API boundary.
#[derive(Debug, Clone)]
pub struct User {
  pub id:            Uuid,
  pub username:      String,
  pub password_hash: String,
  pub role:          Role,
  pub capabilities:  Capabilities,
  pub created_at:    DateTime<Utc>,
}

impl User {
  /// The per-request identity snapshot handed to the engine.
  pub fn actor(&self) -> Actor {
    Actor {
      user_id:      self.id,
      role:         self.role,
      capabilities: match self.role {
        Role::Superadmin => Capabilities::all(),
        Role::Admin => self.capabilities,
      },
    }
  }
}

/// Input to [`crate::store::ScheduleStore::create_user`].
/// `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub username:      String,
  pub password_hash: String,
  pub role:          Role,
  pub capabilities:  Capabilities,
}
