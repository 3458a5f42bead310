//! CSV dataset store
//!
//! The CSV file is the hand-off artifact: a header row in fixed column order,
//! one row per listing, UTF-8, no index column. Writes go to a temporary file
//! in the same directory which then replaces the dataset in one rename.

use crate::record::{JobListing, COLUMNS};
use crate::storage::traits::{DatasetStore, StorageError, StorageResult};
use crate::storage::{Snapshot, SnapshotId};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tempfile::NamedTempFile;

/// Dataset store backed by a single CSV file
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    fn write_rows(file: &mut NamedTempFile, listings: &[JobListing]) -> StorageResult<()> {
        let mut writer = csv::Writer::from_writer(file);

        // Serialization only emits a header alongside the first row
        if listings.is_empty() {
            writer.write_record(COLUMNS)?;
        }
        for listing in listings {
            writer.serialize(listing)?;
        }

        writer.flush()?;
        Ok(())
    }
}

impl DatasetStore for CsvStore {
    fn save(&mut self, listings: &[JobListing]) -> StorageResult<SnapshotId> {
        let dir = self.parent_dir();
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        Self::write_rows(&mut tmp, listings)?;

        let previous = match fs::metadata(&self.path) {
            Ok(existing) => {
                // Keep the permissions readers already rely on
                tmp.as_file().set_permissions(existing.permissions())?;
                Some(snapshot_id(existing.modified()?))
            }
            Err(_) => None,
        };

        // A save within the same millisecond as the previous one still gets a newer id
        let written = snapshot_id(tmp.as_file().metadata()?.modified()?);
        if let Some(previous) = previous.filter(|previous| written <= *previous) {
            let bumped = UNIX_EPOCH + Duration::from_millis(previous.0 as u64 + 1);
            tmp.as_file().set_modified(bumped)?;
        }
        tmp.as_file().sync_all()?;

        tmp.persist(&self.path).map_err(|e| StorageError::Persist {
            path: self.path.display().to_string(),
            source: e.error,
        })?;

        let modified = fs::metadata(&self.path)?.modified()?;
        Ok(snapshot_id(modified))
    }

    fn load_latest(&self) -> StorageResult<Option<Snapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let modified = fs::metadata(&self.path)?.modified()?;
        let mut reader = csv::Reader::from_path(&self.path)?;

        let headers = reader.headers()?.clone();
        if !headers.iter().eq(COLUMNS.iter().copied()) {
            return Err(StorageError::Schema(headers.iter().collect::<Vec<_>>().join(",")));
        }

        let listings = reader
            .deserialize::<JobListing>()
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(Snapshot {
            id: snapshot_id(modified),
            created_at: DateTime::<Utc>::from(modified).to_rfc3339(),
            listings,
        }))
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Snapshot id of a CSV file: its modification time in milliseconds
///
/// Successive saves through [`CsvStore`] get strictly increasing ids on
/// filesystems that keep millisecond timestamps; coarser filesystems may
/// truncate a bumped time back onto the previous id.
fn snapshot_id(modified: SystemTime) -> SnapshotId {
    let millis = modified
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0);
    SnapshotId(millis)
}
