//! SQL schema for the rota SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `PRAGMA user_version` number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id                     TEXT PRIMARY KEY,
    username                    TEXT NOT NULL UNIQUE,
    password_hash               TEXT NOT NULL,   -- argon2 PHC string
    role                        TEXT NOT NULL,   -- 'admin' | 'superadmin'
    can_edit_principal_schedule INTEGER NOT NULL DEFAULT 0,
    can_manage_conference_hall  INTEGER NOT NULL DEFAULT 0,
    can_manage_auditorium       INTEGER NOT NULL DEFAULT 0,
    can_manage_dynamic_entities INTEGER NOT NULL DEFAULT 0,
    created_at                  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS dynamic_entities (
    entity_id  TEXT PRIMARY KEY,
    name       TEXT NOT NULL,
    kind_label TEXT NOT NULL,
    manager_id TEXT REFERENCES users(user_id) ON DELETE SET NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS schedule_entries (
    entry_id      TEXT PRIMARY KEY,
    title         TEXT NOT NULL,
    kind          TEXT NOT NULL,   -- free-text category ('meeting', ...)
    status        TEXT NOT NULL,   -- 'confirmed' | 'tentative' | 'cancelled'
    color         TEXT,
    description   TEXT,
    meeting_with  TEXT,
    location      TEXT,
    date          TEXT NOT NULL,   -- ISO 8601 calendar date
    start_time    TEXT NOT NULL,   -- 'HH:MM:SS', org-local
    end_time      TEXT NOT NULL,
    resource_kind TEXT NOT NULL,   -- 'room' | 'entity'
    resource_ref  TEXT NOT NULL,   -- room discriminant or entity uuid
    approved      INTEGER NOT NULL,
    created_by    TEXT REFERENCES users(user_id) ON DELETE SET NULL
);

CREATE INDEX IF NOT EXISTS entries_resource_date_idx
    ON schedule_entries(resource_kind, resource_ref, date);
CREATE INDEX IF NOT EXISTS entries_date_idx ON schedule_entries(date);
CREATE INDEX IF NOT EXISTS entities_name_idx ON dynamic_entities(name);

PRAGMA user_version = 1;
";
