//! SQL schema for the Vow SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Every collection table has the same shape: key columns used for filtering
/// and ordering, plus the full document as JSON.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One plan per owner; the owner id is the key.
CREATE TABLE IF NOT EXISTS wedding_plans (
    owner_id    TEXT PRIMARY KEY,
    created_at  TEXT NOT NULL,   -- ISO 8601 UTC; first save only
    updated_at  TEXT NOT NULL,
    body_json   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS tasks (
    doc_id      TEXT PRIMARY KEY,
    owner_id    TEXT NOT NULL,
    created_at  TEXT NOT NULL,   -- ISO 8601 UTC; store-assigned
    updated_at  TEXT,
    body_json   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS guests (
    doc_id      TEXT PRIMARY KEY,
    owner_id    TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    updated_at  TEXT,
    body_json   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS expenses (
    doc_id      TEXT PRIMARY KEY,
    owner_id    TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    updated_at  TEXT,
    body_json   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS checklist_items (
    doc_id      TEXT PRIMARY KEY,
    owner_id    TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    updated_at  TEXT,
    body_json   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS tasks_owner_idx           ON tasks(owner_id);
CREATE INDEX IF NOT EXISTS guests_owner_idx          ON guests(owner_id);
CREATE INDEX IF NOT EXISTS expenses_owner_idx        ON expenses(owner_id);
CREATE INDEX IF NOT EXISTS checklist_items_owner_idx ON checklist_items(owner_id);

PRAGMA user_version = 1;
";
