//! Last-Used Birth Record Persistence
//!
//! A single record is kept: the birth date and time entered most recently,
//! offered as the default the next time the prompt runs.
//!
//! The store is a capability trait so the input flow can be handed an
//! in-memory fake in tests.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, warn};

use crate::birth::BirthRecord;
use crate::config::Precision;

/// Errors writing the record
#[derive(Debug, Error)]
pub enum StoreError {
    /// Could not create the directory holding the record
    #[error("Failed to create record directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Could not write the record file
    #[error("Failed to write birth record to {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Load/save of the last-used birth record
pub trait PersistenceStore {
    /// The saved record, or `None` when missing or unreadable
    fn load(&self) -> Option<BirthRecord>;

    /// Replace the saved record
    fn save(&self, record: &BirthRecord) -> Result<(), StoreError>;
}

// ============================================================================
// FileStore
// ============================================================================

/// Two-line text file on disk
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
    precision: Precision,
}

impl FileStore {
    /// Store at `path`, writing times with the given precision
    pub fn new(path: impl Into<PathBuf>, precision: Precision) -> Self {
        Self {
            path: path.into(),
            precision,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PersistenceStore for FileStore {
    fn load(&self) -> Option<BirthRecord> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No saved birth record");
                return None;
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read birth record");
                return None;
            }
        };

        match BirthRecord::from_record_text(&text) {
            Ok(record) => {
                debug!(path = %self.path.display(), date = %record.date_string(), "Loaded birth record");
                Some(record)
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring invalid birth record");
                None
            }
        }
    }

    fn save(&self, record: &BirthRecord) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        std::fs::write(&self.path, record.to_record_text(self.precision)).map_err(|source| {
            StoreError::Write {
                path: self.path.clone(),
                source,
            }
        })?;

        debug!(path = %self.path.display(), "Saved birth record");
        Ok(())
    }
}

// ============================================================================
// MemoryStore
// ============================================================================

/// In-memory store for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    record: Mutex<Option<BirthRecord>>,
    saves: Mutex<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with a record
    pub fn with_record(record: BirthRecord) -> Self {
        Self {
            record: Mutex::new(Some(record)),
            saves: Mutex::new(0),
        }
    }

    /// How many times [`PersistenceStore::save`] was called
    pub fn save_count(&self) -> usize {
        *self.saves.lock()
    }
}

impl PersistenceStore for MemoryStore {
    fn load(&self) -> Option<BirthRecord> {
        *self.record.lock()
    }

    fn save(&self, record: &BirthRecord) -> Result<(), StoreError> {
        *self.record.lock() = Some(*record);
        *self.saves.lock() += 1;
        Ok(())
    }
}

impl<S: PersistenceStore + ?Sized> PersistenceStore for &S {
    fn load(&self) -> Option<BirthRecord> {
        (**self).load()
    }

    fn save(&self, record: &BirthRecord) -> Result<(), StoreError> {
        (**self).save(record)
    }
}
