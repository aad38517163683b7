//! File Store - Atomic JSON Key-Value Persistence
//!
//! Keeps every key in one JSON object file (`journal.json` by default)
//! and rewrites it on each change using atomic writes (write to tmp
//! file, then rename). The file is always either the old or the new
//! version, never a partial write.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, instrument};

use crate::error::StorageError;
use crate::ports::storage::KeyValueStore;

/// Key-value store backed by a single JSON file.
///
/// The whole map is cached in memory; reads never touch the disk.
#[derive(Debug)]
pub struct FileStore {
    /// Path to the journal file.
    path: PathBuf,
    /// Temporary path for atomic writes.
    tmp_path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open `<data_dir>/<file_name>`, creating the directory if needed.
    ///
    /// A missing file is a fresh journal. A file that exists but is not
    /// a JSON object of strings is an error, so it is never overwritten.
    #[instrument]
    pub fn open(data_dir: &Path, file_name: &str) -> Result<Self> {
        fs::create_dir_all(data_dir).with_context(|| {
            format!("Failed to create data directory {}", data_dir.display())
        })?;

        let path = data_dir.join(file_name);
        let tmp_path = data_dir.join(format!("{file_name}.tmp"));

        let entries = if path.exists() {
            let json = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let entries: BTreeMap<String, String> = serde_json::from_str(&json)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            info!(path = %path.display(), keys = entries.len(), "Journal file loaded");
            entries
        } else {
            info!(path = %path.display(), "No journal file found, starting fresh");
            BTreeMap::new()
        };

        Ok(Self {
            path,
            tmp_path,
            entries,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the whole map atomically (tmp → rename).
    fn flush(&self, key: &str) -> Result<(), StorageError> {
        let write_err = |reason: String| StorageError::Write {
            key: key.to_string(),
            reason,
        };

        let json = serde_json::to_string_pretty(&self.entries).map_err(|source| {
            StorageError::Encode {
                key: key.to_string(),
                source,
            }
        })?;

        fs::write(&self.tmp_path, json)
            .map_err(|e| write_err(format!("tmp write {}: {e}", self.tmp_path.display())))?;

        fs::rename(&self.tmp_path, &self.path)
            .map_err(|e| write_err(format!("rename to {}: {e}", self.path.display())))?;

        debug!(path = %self.path.display(), key, "Journal file written");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush(key)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.entries.remove(key).is_none() {
            return Ok(());
        }
        self.flush(key)
    }
}
