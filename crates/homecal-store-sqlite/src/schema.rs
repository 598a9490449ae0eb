//! SQL schema for the homecal SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS remember_days (
    id            TEXT PRIMARY KEY,
    user_id       TEXT NOT NULL,
    title         TEXT NOT NULL,
    description   TEXT NOT NULL DEFAULT '',
    date          TEXT NOT NULL,   -- ISO solar date; the canonical storage form
    calendar_type TEXT NOT NULL    -- 'solar' | 'lunar'; entry provenance only
);

CREATE TABLE IF NOT EXISTS milestones (
    id                  TEXT PRIMARY KEY,
    user_id             TEXT NOT NULL,
    title               TEXT NOT NULL,
    description         TEXT NOT NULL DEFAULT '',
    start_date          TEXT NOT NULL,   -- ISO solar date
    end_date            TEXT,            -- ISO solar date or NULL
    time                TEXT,            -- 'HH:MM' or NULL
    notify              INTEGER NOT NULL DEFAULT 0,
    notify_before_hours INTEGER          -- NULL whenever notify is 0
);

CREATE TABLE IF NOT EXISTS calendar_links (
    id       TEXT PRIMARY KEY,
    user_id  TEXT NOT NULL,
    app_name TEXT NOT NULL,
    url      TEXT NOT NULL
);

-- List queries are user-scoped and sorted; ISO dates sort chronologically as
-- text.
CREATE INDEX IF NOT EXISTS remember_days_user_idx  ON remember_days(user_id, date);
CREATE INDEX IF NOT EXISTS milestones_user_idx     ON milestones(user_id, start_date);
CREATE INDEX IF NOT EXISTS calendar_links_user_idx ON calendar_links(user_id, app_name);

PRAGMA user_version = 1;
";
