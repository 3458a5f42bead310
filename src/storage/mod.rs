//! Storage module for persisting dataset snapshots
//!
//! This module handles:
//! - The CSV dataset consumed by downstream readers (atomic full replacement)
//! - An optional SQLite snapshot history
//! - The `DatasetStore` interface both implement

mod csv_store;
mod schema;
mod sqlite;
mod traits;

pub use csv_store::CsvStore;
pub use sqlite::{SnapshotInfo, SqliteStore};
pub use traits::{DatasetStore, StorageError, StorageResult};

use crate::config::OutputConfig;
use crate::record::JobListing;
use std::fmt;
use std::path::Path;

/// Identifier of one persisted snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnapshotId(pub i64);

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One persisted dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub id: SnapshotId,

    /// RFC 3339 timestamp of the write
    pub created_at: String,

    pub listings: Vec<JobListing>,
}

/// Opens every store the output configuration names
///
/// The CSV store always comes first; the SQLite history follows when a
/// database path is configured.
pub fn open_stores(
    config: &OutputConfig,
    config_hash: Option<&str>,
) -> StorageResult<Vec<Box<dyn DatasetStore>>> {
    let mut stores: Vec<Box<dyn DatasetStore>> = vec![Box::new(CsvStore::new(&config.csv_path))];

    if let Some(db_path) = &config.database_path {
        let mut sqlite = SqliteStore::new(Path::new(db_path))?;
        if let Some(hash) = config_hash {
            sqlite = sqlite.with_config_hash(hash);
        }
        stores.push(Box::new(sqlite));
    }

    Ok(stores)
}
