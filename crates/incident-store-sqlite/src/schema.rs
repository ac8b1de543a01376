//! SQL schema for the incident SQLite store.
//!
//! Executed once at connection startup. Creation is idempotent; there is no
//! migration logic.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Timestamps are fixed-width RFC 3339 UTC text, so ordering by the column
/// text is chronological ordering.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS incidents (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    incident_id  TEXT,
    date_created TEXT,             -- null until the incident is created
    date         TEXT,             -- null keeps it off the timeline
    city         TEXT,
    state        TEXT,
    lat          REAL,
    long         REAL,
    title        TEXT,
    \"desc\"     TEXT,
    tags         TEXT NOT NULL DEFAULT '[]',   -- JSON array of strings
    force_rank   INTEGER,
    confidence   REAL,
    status       TEXT,             -- 'pending' | 'approved' | 'rejected'
    user_name    TEXT,
    tweet_id     TEXT
);

CREATE INDEX IF NOT EXISTS incidents_incident_id_idx  ON incidents(incident_id);
CREATE INDEX IF NOT EXISTS incidents_status_idx       ON incidents(status, date_created);
CREATE INDEX IF NOT EXISTS incidents_date_created_idx ON incidents(date_created);
";

/// Column list shared by every `SELECT` that loads a full record. The order
/// matches [`crate::encode::RawIncident::from_row`].
pub const INCIDENT_COLUMNS: &str = "id, incident_id, date_created, date, city, state, lat, long, \
   title, \"desc\", tags, force_rank, confidence, status, user_name, tweet_id";
