//! The `ScheduleStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `rota-store-sqlite`).
//! Higher layers (`rota-api`, `rota-server`) depend on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
  actor::{NewUser, User},
  entry::ScheduleEntry,
  resource::{DynamicEntity, NewDynamicEntity, Resource},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`ScheduleStore::list_entries`] — the calendar read side.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
  pub date:     Option<NaiveDate>,
  /// Restrict to a specific entry kind (e.g. `"meeting"`).
  pub kind:     Option<String>,
  pub resource: Option<Resource>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a rota storage backend.
///
/// Single-row operations are assumed atomic. Serializing the overlap read
/// against the subsequent write is the engine's job
/// ([`crate::lifecycle::Scheduler`]), not the store's.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ScheduleStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Schedule entries ──────────────────────────────────────────────────

  /// Persist a fully-built entry. The caller assigns the id.
  fn insert_entry(
    &self,
    entry: ScheduleEntry,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Replace the stored record for `entry.id`.
  fn update_entry(
    &self,
    entry: ScheduleEntry,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn delete_entry(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn get_entry(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<ScheduleEntry>, Self::Error>> + Send + '_;

  /// All **approved** entries on exactly this resource and date, minus
  /// `exclude` (the entry being edited, to avoid self-conflict). Time-range
  /// filtering is the overlap detector's job.
  fn query_conflict_candidates(
    &self,
    resource: Resource,
    date: NaiveDate,
    exclude: Option<Uuid>,
  ) -> impl Future<Output = Result<Vec<ScheduleEntry>, Self::Error>> + Send + '_;

  /// Calendar feed: entries matching `filter`, ordered by date then start
  /// time. Returns pending and approved entries alike.
  fn list_entries(
    &self,
    filter: EntryFilter,
  ) -> impl Future<Output = Result<Vec<ScheduleEntry>, Self::Error>> + Send + '_;

  // ── Dynamic-entity registry ───────────────────────────────────────────

  /// Create and persist a registry record. The store assigns id and
  /// creation time.
  fn create_entity(
    &self,
    input: NewDynamicEntity,
  ) -> impl Future<Output = Result<DynamicEntity, Self::Error>> + Send + '_;

  fn get_entity(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<DynamicEntity>, Self::Error>> + Send + '_;

  /// All registry records, ordered by name.
  fn list_entities(
    &self,
  ) -> impl Future<Output = Result<Vec<DynamicEntity>, Self::Error>> + Send + '_;

  /// Replace the stored record for `entity.id`.
  fn update_entity(
    &self,
    entity: DynamicEntity,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn delete_entity(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// How many schedule entries currently reference this entity. Used to
  /// refuse deleting a registry record that is still booked against.
  fn entity_entry_count(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  // ── User accounts ─────────────────────────────────────────────────────

  /// Create and persist an account. The store assigns id and creation time.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn get_user_by_username<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  fn list_users(
    &self,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  /// Replace the stored record for `user.id`.
  fn update_user(
    &self,
    user: User,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn set_password_hash(
    &self,
    id: Uuid,
    password_hash: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn delete_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
