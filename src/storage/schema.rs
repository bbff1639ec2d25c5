//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Bookmark-Sift database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Serialized blobs (the corpus lives under a single key)
CREATE TABLE IF NOT EXISTS kv (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Track scan runs
CREATE TABLE IF NOT EXISTS scans (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    config_hash TEXT NOT NULL,
    force_refresh INTEGER NOT NULL DEFAULT 0,
    status TEXT NOT NULL,
    added_count INTEGER,
    removed_count INTEGER,
    acquired_count INTEGER,
    error_message TEXT
);

CREATE INDEX IF NOT EXISTS idx_scans_status ON scans(status);
"#;

/// Initializes the database schema
///
/// Creates all tables and indexes if they don't already exist.
pub fn initialize_schema(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}
