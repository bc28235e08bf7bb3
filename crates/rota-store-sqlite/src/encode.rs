//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings; calendar dates and times-of-day are ISO
//! 8601 (`%Y-%m-%d`, `%H:%M:%S`). UUIDs are stored as hyphenated lowercase
//! strings. The resource union is stored as a `(kind, ref)` column pair.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rota_core::{
  actor::{Capabilities, Role, User},
  entry::{EntryStatus, ScheduleEntry},
  resource::{DynamicEntity, Resource, Room},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── Timestamps, dates, times ────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::Decode(e.to_string()))
}

pub fn encode_time(t: NaiveTime) -> String { t.format("%H:%M:%S").to_string() }

pub fn decode_time(s: &str) -> Result<NaiveTime> {
  NaiveTime::parse_from_str(s, "%H:%M:%S")
    .map_err(|e| Error::Decode(e.to_string()))
}

// ─── Role ────────────────────────────────────────────────────────────────────

pub fn encode_role(r: Role) -> &'static str {
  match r {
    Role::Admin => "admin",
    Role::Superadmin => "superadmin",
  }
}

pub fn decode_role(s: &str) -> Result<Role> {
  match s {
    "admin" => Ok(Role::Admin),
    "superadmin" => Ok(Role::Superadmin),
    other => Err(Error::Decode(format!("unknown role: {other:?}"))),
  }
}

// ─── EntryStatus ─────────────────────────────────────────────────────────────

pub fn encode_status(s: EntryStatus) -> &'static str {
  match s {
    EntryStatus::Confirmed => "confirmed",
    EntryStatus::Tentative => "tentative",
    EntryStatus::Cancelled => "cancelled",
  }
}

pub fn decode_status(s: &str) -> Result<EntryStatus> {
  match s {
    "confirmed" => Ok(EntryStatus::Confirmed),
    "tentative" => Ok(EntryStatus::Tentative),
    "cancelled" => Ok(EntryStatus::Cancelled),
    other => Err(Error::Decode(format!("unknown entry status: {other:?}"))),
  }
}

// ─── Resource ────────────────────────────────────────────────────────────────

fn encode_room(room: Room) -> &'static str {
  match room {
    Room::Office => "office",
    Room::ConferenceHall => "conference_hall",
    Room::Auditorium => "auditorium",
  }
}

fn decode_room(s: &str) -> Result<Room> {
  match s {
    "office" => Ok(Room::Office),
    "conference_hall" => Ok(Room::ConferenceHall),
    "auditorium" => Ok(Room::Auditorium),
    other => Err(Error::Decode(format!("unknown room: {other:?}"))),
  }
}

/// Split the resource union into the `(resource_kind, resource_ref)` column
/// pair.
pub fn encode_resource(r: Resource) -> (&'static str, String) {
  match r {
    Resource::Room(room) => ("room", encode_room(room).to_owned()),
    Resource::Entity(id) => ("entity", encode_uuid(id)),
  }
}

pub fn decode_resource(kind: &str, reference: &str) -> Result<Resource> {
  match kind {
    "room" => Ok(Resource::Room(decode_room(reference)?)),
    "entity" => Ok(Resource::Entity(decode_uuid(reference)?)),
    other => Err(Error::Decode(format!("unknown resource kind: {other:?}"))),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `schedule_entries` row.
pub struct RawEntry {
  pub entry_id:      String,
  pub title:         String,
  pub kind:          String,
  pub status:        String,
  pub color:         Option<String>,
  pub description:   Option<String>,
  pub meeting_with:  Option<String>,
  pub location:      Option<String>,
  pub date:          String,
  pub start_time:    String,
  pub end_time:      String,
  pub resource_kind: String,
  pub resource_ref:  String,
  pub approved:      bool,
  pub created_by:    Option<String>,
}

impl RawEntry {
  pub fn into_entry(self) -> Result<ScheduleEntry> {
    Ok(ScheduleEntry {
      id:           decode_uuid(&self.entry_id)?,
      title:        self.title,
      kind:         self.kind,
      status:       decode_status(&self.status)?,
      color:        self.color,
      description:  self.description,
      meeting_with: self.meeting_with,
      location:     self.location,
      date:         decode_date(&self.date)?,
      start_time:   decode_time(&self.start_time)?,
      end_time:     decode_time(&self.end_time)?,
      resource:     decode_resource(&self.resource_kind, &self.resource_ref)?,
      approved:     self.approved,
      created_by:   self
        .created_by
        .as_deref()
        .map(decode_uuid)
        .transpose()?,
    })
  }
}

/// Raw strings read directly from a `dynamic_entities` row.
pub struct RawEntity {
  pub entity_id:  String,
  pub name:       String,
  pub kind_label: String,
  pub manager_id: Option<String>,
  pub created_at: String,
}

impl RawEntity {
  pub fn into_entity(self) -> Result<DynamicEntity> {
    Ok(DynamicEntity {
      id:         decode_uuid(&self.entity_id)?,
      name:       self.name,
      kind_label: self.kind_label,
      manager:    self
        .manager_id
        .as_deref()
        .map(decode_uuid)
        .transpose()?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `users` row.
pub struct RawUser {
  pub user_id:                     String,
  pub username:                    String,
  pub password_hash:               String,
  pub role:                        String,
  pub can_edit_principal_schedule: bool,
  pub can_manage_conference_hall:  bool,
  pub can_manage_auditorium:       bool,
  pub can_manage_dynamic_entities: bool,
  pub created_at:                  String,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:            decode_uuid(&self.user_id)?,
      username:      self.username,
      password_hash: self.password_hash,
      role:          decode_role(&self.role)?,
      capabilities:  Capabilities {
        edit_principal_schedule: self.can_edit_principal_schedule,
        manage_conference_hall:  self.can_manage_conference_hall,
        manage_auditorium:       self.can_manage_auditorium,
        manage_dynamic_entities: self.can_manage_dynamic_entities,
      },
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}
