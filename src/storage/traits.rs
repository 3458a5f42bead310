//! Storage traits and error types
//!
//! This module defines the trait interface for dataset stores and
//! associated error types.

use crate::record::JobListing;
use crate::storage::{Snapshot, SnapshotId};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Failed to replace {path}: {source}")]
    Persist {
        path: String,
        source: std::io::Error,
    },

    #[error("Unexpected dataset columns: {0}")]
    Schema(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A durable home for dataset snapshots
///
/// Each `save` replaces what consumers see with a complete new snapshot;
/// `load_latest` returns the most recent completed one. Readers never observe
/// a partially written snapshot.
pub trait DatasetStore: Send {
    /// Persists a full snapshot and returns its identifier
    fn save(&mut self, listings: &[JobListing]) -> StorageResult<SnapshotId>;

    /// Loads the most recent snapshot, if any run has completed
    fn load_latest(&self) -> StorageResult<Option<Snapshot>>;

    /// Human-readable location for logs and reports
    fn location(&self) -> String;
}
