//! Database schema definitions
//!
//! This module contains the SQL schema for the snapshot history database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One row per completed run
CREATE TABLE IF NOT EXISTS snapshots (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at TEXT NOT NULL,
    config_hash TEXT,
    record_count INTEGER NOT NULL
);

-- Listings of every snapshot, in dataset order
CREATE TABLE IF NOT EXISTS listings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    snapshot_id INTEGER NOT NULL REFERENCES snapshots(id) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    category TEXT NOT NULL,
    organization_name TEXT NOT NULL,
    vacancies TEXT NOT NULL,
    salary TEXT NOT NULL,
    age_limit TEXT NOT NULL,
    experience TEXT NOT NULL,
    qualification TEXT NOT NULL,
    post_url TEXT NOT NULL,
    UNIQUE(snapshot_id, position)
);

CREATE INDEX IF NOT EXISTS idx_listings_snapshot ON listings(snapshot_id);
CREATE INDEX IF NOT EXISTS idx_listings_category ON listings(category);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
