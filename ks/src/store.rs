//! Core KnowledgeStore implementation

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors from reading or writing the knowledge file
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Knowledge file {path} is not a valid record: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode knowledge record: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The single stored knowledge blob
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeRecord {
    /// Raw text extracted from the last uploaded document
    #[serde(default)]
    pub general_info: String,
}

impl KnowledgeRecord {
    pub fn new(general_info: impl Into<String>) -> Self {
        Self {
            general_info: general_info.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.general_info.is_empty()
    }
}

/// Flat-file store holding at most one [`KnowledgeRecord`]
///
/// Every `save` replaces the whole file. Writes are not atomic: a crash in
/// the middle of a write can leave a truncated record behind, which the next
/// `load` reports as [`StoreError::Parse`].
#[derive(Debug, Clone)]
pub struct KnowledgeStore {
    path: PathBuf,
}

impl KnowledgeStore {
    /// Bind a store to the given file, creating its parent directory
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        debug!(?path, "Opened knowledge store");
        Ok(Self { path })
    }

    /// Location of the knowledge file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the stored record with `text`
    pub fn save(&self, text: &str) -> Result<(), StoreError> {
        let record = KnowledgeRecord::new(text);
        let content = serde_json::to_string(&record).map_err(StoreError::Encode)?;
        fs::write(&self.path, content).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        info!(path = %self.path.display(), chars = text.len(), "Saved knowledge record");
        Ok(())
    }

    /// Read the stored record; a missing file is an empty record
    pub fn load(&self) -> Result<KnowledgeRecord, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "load: no record yet");
                return Ok(KnowledgeRecord::default());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let record: KnowledgeRecord = serde_json::from_str(&content).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })?;
        debug!(chars = record.general_info.len(), "load: record read");
        Ok(record)
    }

    /// Remove the stored record
    pub fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "Cleared knowledge record");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}
