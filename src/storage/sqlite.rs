//! SQLite snapshot history
//!
//! Every run appends one snapshot; `load_latest` only ever returns the newest,
//! so consumers still see full-replacement semantics while older runs stay
//! queryable.

use crate::record::JobListing;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{DatasetStore, StorageResult};
use crate::storage::{Snapshot, SnapshotId};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

/// Summary row of a stored snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotInfo {
    pub id: SnapshotId,
    pub created_at: String,
    pub config_hash: Option<String>,
    pub record_count: usize,
}

/// SQLite storage backend
pub struct SqliteStore {
    conn: Connection,
    path: PathBuf,
    config_hash: Option<String>,
}

impl SqliteStore {
    /// Opens or creates the database at `path`
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn,
            path: path.to_path_buf(),
            config_hash: None,
        })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn,
            path: PathBuf::from(":memory:"),
            config_hash: None,
        })
    }

    /// Tags every snapshot saved through this store with a configuration hash
    pub fn with_config_hash(mut self, hash: &str) -> Self {
        self.config_hash = Some(hash.to_string());
        self
    }

    /// Lists stored snapshots, newest first
    pub fn list_snapshots(&self) -> StorageResult<Vec<SnapshotInfo>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, created_at, config_hash, record_count FROM snapshots ORDER BY id DESC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(SnapshotInfo {
                id: SnapshotId(row.get(0)?),
                created_at: row.get(1)?,
                config_hash: row.get(2)?,
                record_count: row.get::<_, i64>(3)? as usize,
            })
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn load_listings(&self, id: SnapshotId) -> StorageResult<Vec<JobListing>> {
        let mut stmt = self.conn.prepare(
            "SELECT category, organization_name, vacancies, salary, age_limit,
             experience, qualification, post_url
             FROM listings WHERE snapshot_id = ?1 ORDER BY position",
        )?;

        let rows = stmt.query_map(params![id.0], |row| {
            Ok(JobListing {
                category: row.get(0)?,
                organization_name: row.get(1)?,
                vacancies: row.get(2)?,
                salary: row.get(3)?,
                age_limit: row.get(4)?,
                experience: row.get(5)?,
                qualification: row.get(6)?,
                post_url: row.get(7)?,
            })
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

impl DatasetStore for SqliteStore {
    fn save(&mut self, listings: &[JobListing]) -> StorageResult<SnapshotId> {
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO snapshots (created_at, config_hash, record_count) VALUES (?1, ?2, ?3)",
            params![
                Utc::now().to_rfc3339(),
                self.config_hash,
                listings.len() as i64
            ],
        )?;
        let snapshot_id = tx.last_insert_rowid();

        {
            let mut stmt = tx.prepare(
                "INSERT INTO listings (snapshot_id, position, category, organization_name,
                 vacancies, salary, age_limit, experience, qualification, post_url)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;

            for (position, listing) in listings.iter().enumerate() {
                stmt.execute(params![
                    snapshot_id,
                    position as i64,
                    listing.category,
                    listing.organization_name,
                    listing.vacancies,
                    listing.salary,
                    listing.age_limit,
                    listing.experience,
                    listing.qualification,
                    listing.post_url,
                ])?;
            }
        }

        tx.commit()?;
        Ok(SnapshotId(snapshot_id))
    }

    fn load_latest(&self) -> StorageResult<Option<Snapshot>> {
        let latest = self
            .conn
            .query_row(
                "SELECT id, created_at FROM snapshots ORDER BY id DESC LIMIT 1",
                [],
                |row| Ok((SnapshotId(row.get(0)?), row.get::<_, String>(1)?)),
            )
            .optional()?;

        match latest {
            Some((id, created_at)) => Ok(Some(Snapshot {
                id,
                created_at,
                listings: self.load_listings(id)?,
            })),
            None => Ok(None),
        }
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
