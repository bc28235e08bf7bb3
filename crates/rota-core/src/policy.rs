//! The authorization policy — who may write to which resource.
//!
//! Pure and total. Identical for create, update, and delete; the approval
//! state of the entry being acted on is the approval resolver's concern, not
//! the policy's.

use crate::{
  actor::{Actor, Role},
  resource::{ResolvedResource, Resource, Room},
};

/// Whether `actor` may write to `resource`'s schedule.
///
/// Superadmins always may. Admins need the capability flag bound to the
/// specific fixed room, or — for dynamic entities — either the global
/// `manage_dynamic_entities` right or the entity's manager assignment.
pub fn can_write(actor: &Actor, resource: &ResolvedResource) -> bool {
  if actor.role == Role::Superadmin {
    return true;
  }
  match resource.resource {
    Resource::Room(Room::Office) => actor.capabilities.edit_principal_schedule,
    Resource::Room(Room::ConferenceHall) => {
      actor.capabilities.manage_conference_hall
    }
    Resource::Room(Room::Auditorium) => actor.capabilities.manage_auditorium,
    Resource::Entity(_) => {
      actor.capabilities.manage_dynamic_entities
        || resource.manager == Some(actor.user_id)
    }
  }
}

#[cfg(test)]
mod tests {
  use uuid::Uuid;

  use super::*;
  use crate::actor::Capabilities;

  fn admin(capabilities: Capabilities) -> Actor {
    Actor {
      user_id: Uuid::new_v4(),
      role: Role::Admin,
      capabilities,
    }
  }

  fn superadmin() -> Actor {
    Actor {
      user_id:      Uuid::new_v4(),
      role:         Role::Superadmin,
      capabilities: Capabilities::all(),
    }
  }

  fn entity(manager: Option<Uuid>) -> ResolvedResource {
    ResolvedResource {
      resource: Resource::Entity(Uuid::new_v4()),
      manager,
    }
  }

  #[test]
  fn superadmin_writes_everywhere() {
    let actor = superadmin();
    for room in [Room::Office, Room::ConferenceHall, Room::Auditorium] {
      assert!(can_write(&actor, &ResolvedResource::room(room)));
    }
    assert!(can_write(&actor, &entity(None)));
  }

  #[test]
  fn admin_without_flags_writes_nowhere() {
    let actor = admin(Capabilities::default());
    for room in [Room::Office, Room::ConferenceHall, Room::Auditorium] {
      assert!(!can_write(&actor, &ResolvedResource::room(room)));
    }
    assert!(!can_write(&actor, &entity(None)));
  }

  #[test]
  fn room_flags_are_room_specific() {
    let actor = admin(Capabilities {
      manage_auditorium: true,
      ..Capabilities::default()
    });
    assert!(can_write(&actor, &ResolvedResource::room(Room::Auditorium)));
    assert!(!can_write(&actor, &ResolvedResource::room(Room::Office)));
    assert!(!can_write(
      &actor,
      &ResolvedResource::room(Room::ConferenceHall)
    ));
  }

  #[test]
  fn office_flag_gates_the_principal_schedule() {
    let actor = admin(Capabilities {
      edit_principal_schedule: true,
      ..Capabilities::default()
    });
    assert!(can_write(&actor, &ResolvedResource::room(Room::Office)));
    assert!(!can_write(&actor, &ResolvedResource::room(Room::Auditorium)));
  }

  #[test]
  fn global_entity_flag_covers_unmanaged_entities() {
    let actor = admin(Capabilities {
      manage_dynamic_entities: true,
      ..Capabilities::default()
    });
    assert!(can_write(&actor, &entity(None)));
    assert!(can_write(&actor, &entity(Some(Uuid::new_v4()))));
  }

  #[test]
  fn assigned_manager_writes_without_global_flag() {
    let actor = admin(Capabilities::default());
    assert!(can_write(&actor, &entity(Some(actor.user_id))));
  }

  #[test]
  fn manager_assignment_does_not_leak_to_other_admins() {
    let actor = admin(Capabilities::default());
    assert!(!can_write(&actor, &entity(Some(Uuid::new_v4()))));
  }

  #[test]
  fn entity_rights_do_not_grant_room_access() {
    let actor = admin(Capabilities {
      manage_dynamic_entities: true,
      ..Capabilities::default()
    });
    assert!(!can_write(&actor, &ResolvedResource::room(Room::Office)));
  }
}
