//! [`SqliteStore`] — the SQLite implementation of
//! [`rota_core::store::ScheduleStore`].

use std::path::Path;

use chrono::{NaiveDate, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use rota_core::{
  actor::{NewUser, User},
  entry::ScheduleEntry,
  resource::{DynamicEntity, NewDynamicEntity, Resource},
  store::{EntryFilter, ScheduleStore},
};

use crate::{
  Error, Result,
  encode::{
    RawEntity, RawEntry, RawUser, encode_date, encode_dt, encode_resource,
    encode_role, encode_status, encode_time, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Row readers ─────────────────────────────────────────────────────────────

const ENTRY_COLUMNS: &str = "entry_id, title, kind, status, color, \
  description, meeting_with, location, date, start_time, end_time, \
  resource_kind, resource_ref, approved, created_by";

fn read_entry_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawEntry> {
  Ok(RawEntry {
    entry_id:      row.get(0)?,
    title:         row.get(1)?,
    kind:          row.get(2)?,
    status:        row.get(3)?,
    color:         row.get(4)?,
    description:   row.get(5)?,
    meeting_with:  row.get(6)?,
    location:      row.get(7)?,
    date:          row.get(8)?,
    start_time:    row.get(9)?,
    end_time:      row.get(10)?,
    resource_kind: row.get(11)?,
    resource_ref:  row.get(12)?,
    approved:      row.get(13)?,
    created_by:    row.get(14)?,
  })
}

const ENTITY_COLUMNS: &str =
  "entity_id, name, kind_label, manager_id, created_at";

fn read_entity_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawEntity> {
  Ok(RawEntity {
    entity_id:  row.get(0)?,
    name:       row.get(1)?,
    kind_label: row.get(2)?,
    manager_id: row.get(3)?,
    created_at: row.get(4)?,
  })
}

const USER_COLUMNS: &str = "user_id, username, password_hash, role, \
  can_edit_principal_schedule, can_manage_conference_hall, \
  can_manage_auditorium, can_manage_dynamic_entities, created_at";

fn read_user_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawUser> {
  Ok(RawUser {
    user_id:                     row.get(0)?,
    username:                    row.get(1)?,
    password_hash:               row.get(2)?,
    role:                        row.get(3)?,
    can_edit_principal_schedule: row.get(4)?,
    can_manage_conference_hall:  row.get(5)?,
    can_manage_auditorium:       row.get(6)?,
    can_manage_dynamic_entities: row.get(7)?,
    created_at:                  row.get(8)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A rota store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All
/// statements execute on one connection, so single-row operations are
/// serialized with respect to each other.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── ScheduleStore impl ──────────────────────────────────────────────────────

impl ScheduleStore for SqliteStore {
  type Error = Error;

  // ── Schedule entries ──────────────────────────────────────────────────────

  async fn insert_entry(&self, entry: ScheduleEntry) -> Result<()> {
    let id_str = encode_uuid(entry.id);
    let status_str = encode_status(entry.status).to_owned();
    let date_str = encode_date(entry.date);
    let start_str = encode_time(entry.start_time);
    let end_str = encode_time(entry.end_time);
    let (resource_kind, resource_ref) = encode_resource(entry.resource);
    let created_by_str = entry.created_by.map(encode_uuid);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO schedule_entries (
             entry_id, title, kind, status, color, description,
             meeting_with, location, date, start_time, end_time,
             resource_kind, resource_ref, approved, created_by
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
          rusqlite::params![
            id_str,
            entry.title,
            entry.kind,
            status_str,
            entry.color,
            entry.description,
            entry.meeting_with,
            entry.location,
            date_str,
            start_str,
            end_str,
            resource_kind,
            resource_ref,
            entry.approved,
            created_by_str,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn update_entry(&self, entry: ScheduleEntry) -> Result<()> {
    let id_str = encode_uuid(entry.id);
    let status_str = encode_status(entry.status).to_owned();
    let date_str = encode_date(entry.date);
    let start_str = encode_time(entry.start_time);
    let end_str = encode_time(entry.end_time);
    let (resource_kind, resource_ref) = encode_resource(entry.resource);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE schedule_entries SET
             title = ?2, kind = ?3, status = ?4, color = ?5,
             description = ?6, meeting_with = ?7, location = ?8,
             date = ?9, start_time = ?10, end_time = ?11,
             resource_kind = ?12, resource_ref = ?13, approved = ?14
           WHERE entry_id = ?1",
          rusqlite::params![
            id_str,
            entry.title,
            entry.kind,
            status_str,
            entry.color,
            entry.description,
            entry.meeting_with,
            entry.location,
            date_str,
            start_str,
            end_str,
            resource_kind,
            resource_ref,
            entry.approved,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn delete_entry(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM schedule_entries WHERE entry_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_entry(&self, id: Uuid) -> Result<Option<ScheduleEntry>> {
    let id_str = encode_uuid(id);
    let raw: Option<RawEntry> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {ENTRY_COLUMNS} FROM schedule_entries WHERE entry_id = ?1"
              ),
              rusqlite::params![id_str],
              read_entry_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawEntry::into_entry).transpose()
  }

  async fn query_conflict_candidates(
    &self,
    resource: Resource,
    date: NaiveDate,
    exclude: Option<Uuid>,
  ) -> Result<Vec<ScheduleEntry>> {
    let (resource_kind, resource_ref) = encode_resource(resource);
    let date_str = encode_date(date);
    let exclude_str = exclude.map(encode_uuid);

    let raws: Vec<RawEntry> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ENTRY_COLUMNS} FROM schedule_entries
           WHERE resource_kind = ?1
             AND resource_ref = ?2
             AND date = ?3
             AND approved = 1
             AND (?4 IS NULL OR entry_id != ?4)
           ORDER BY start_time"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![
              resource_kind,
              resource_ref,
              date_str,
              exclude_str,
            ],
            read_entry_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEntry::into_entry).collect()
  }

  async fn list_entries(&self, filter: EntryFilter) -> Result<Vec<ScheduleEntry>> {
    let date_str = filter.date.map(encode_date);
    let kind_str = filter.kind;
    let (resource_kind, resource_ref) = match filter.resource {
      Some(resource) => {
        let (k, r) = encode_resource(resource);
        (Some(k), Some(r))
      }
      None => (None, None),
    };

    let raws: Vec<RawEntry> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ENTRY_COLUMNS} FROM schedule_entries
           WHERE (?1 IS NULL OR date = ?1)
             AND (?2 IS NULL OR kind = ?2)
             AND (?3 IS NULL OR (resource_kind = ?3 AND resource_ref = ?4))
           ORDER BY date, start_time"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![date_str, kind_str, resource_kind, resource_ref],
            read_entry_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEntry::into_entry).collect()
  }

  // ── Dynamic-entity registry ───────────────────────────────────────────────

  async fn create_entity(&self, input: NewDynamicEntity) -> Result<DynamicEntity> {
    let entity = DynamicEntity {
      id:         Uuid::new_v4(),
      name:       input.name,
      kind_label: input.kind_label,
      manager:    input.manager,
      created_at: Utc::now(),
    };

    let id_str = encode_uuid(entity.id);
    let name = entity.name.clone();
    let kind_label = entity.kind_label.clone();
    let manager_str = entity.manager.map(encode_uuid);
    let at_str = encode_dt(entity.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO dynamic_entities (entity_id, name, kind_label, manager_id, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, name, kind_label, manager_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(entity)
  }

  async fn get_entity(&self, id: Uuid) -> Result<Option<DynamicEntity>> {
    let id_str = encode_uuid(id);
    let raw: Option<RawEntity> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {ENTITY_COLUMNS} FROM dynamic_entities WHERE entity_id = ?1"
              ),
              rusqlite::params![id_str],
              read_entity_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawEntity::into_entity).transpose()
  }

  async fn list_entities(&self) -> Result<Vec<DynamicEntity>> {
    let raws: Vec<RawEntity> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ENTITY_COLUMNS} FROM dynamic_entities ORDER BY name"
        ))?;
        let rows = stmt
          .query_map([], read_entity_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEntity::into_entity).collect()
  }

  async fn update_entity(&self, entity: DynamicEntity) -> Result<()> {
    let id_str = encode_uuid(entity.id);
    let manager_str = entity.manager.map(encode_uuid);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE dynamic_entities SET name = ?2, kind_label = ?3, manager_id = ?4
           WHERE entity_id = ?1",
          rusqlite::params![id_str, entity.name, entity.kind_label, manager_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn delete_entity(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM dynamic_entities WHERE entity_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn entity_entry_count(&self, id: Uuid) -> Result<u64> {
    let id_str = encode_uuid(id);
    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM schedule_entries
           WHERE resource_kind = 'entity' AND resource_ref = ?1",
          rusqlite::params![id_str],
          |row| row.get(0),
        )?)
      })
      .await?;
    Ok(count as u64)
  }

  // ── User accounts ─────────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> Result<User> {
    let user = User {
      id:            Uuid::new_v4(),
      username:      input.username,
      password_hash: input.password_hash,
      role:          input.role,
      capabilities:  input.capabilities,
      created_at:    Utc::now(),
    };

    let id_str = encode_uuid(user.id);
    let username = user.username.clone();
    let hash = user.password_hash.clone();
    let role_str = encode_role(user.role).to_owned();
    let caps = user.capabilities;
    let at_str = encode_dt(user.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (
             user_id, username, password_hash, role,
             can_edit_principal_schedule, can_manage_conference_hall,
             can_manage_auditorium, can_manage_dynamic_entities, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![
            id_str,
            username,
            hash,
            role_str,
            caps.edit_principal_schedule,
            caps.manage_conference_hall,
            caps.manage_auditorium,
            caps.manage_dynamic_entities,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(user)
  }

  async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
    let id_str = encode_uuid(id);
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1"),
              rusqlite::params![id_str],
              read_user_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
    let username = username.to_owned();
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1"),
              rusqlite::params![username],
              read_user_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn list_users(&self) -> Result<Vec<User>> {
    let raws: Vec<RawUser> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn
          .prepare(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY username"))?;
        let rows = stmt
          .query_map([], read_user_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUser::into_user).collect()
  }

  async fn update_user(&self, user: User) -> Result<()> {
    let id_str = encode_uuid(user.id);
    let role_str = encode_role(user.role).to_owned();
    let caps = user.capabilities;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE users SET
             username = ?2, password_hash = ?3, role = ?4,
             can_edit_principal_schedule = ?5, can_manage_conference_hall = ?6,
             can_manage_auditorium = ?7, can_manage_dynamic_entities = ?8
           WHERE user_id = ?1",
          rusqlite::params![
            id_str,
            user.username,
            user.password_hash,
            role_str,
            caps.edit_principal_schedule,
            caps.manage_conference_hall,
            caps.manage_auditorium,
            caps.manage_dynamic_entities,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn set_password_hash(&self, id: Uuid, password_hash: String) -> Result<()> {
    let id_str = encode_uuid(id);
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE users SET password_hash = ?2 WHERE user_id = ?1",
          rusqlite::params![id_str, password_hash],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn delete_user(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM users WHERE user_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
