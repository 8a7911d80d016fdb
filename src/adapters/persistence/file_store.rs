//! File Store - One File per Key with Atomic Writes
//!
//! Each key lives in `<data_dir>/<key>.kv`. Writes go to a temporary
//! file first and are then renamed over the target, so a crash leaves
//! either the old or the new document on disk, never a partial write.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, instrument};

use crate::ports::kv_store::{KeyValueStore, StorageError};

/// Directory-backed key-value store.
pub struct FileStore {
    /// Directory holding one file per key.
    data_dir: PathBuf,
}

impl FileStore {
    /// Create a store in the given data directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub async fn new(data_dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let data_dir = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(&data_dir)
            .await
            .map_err(|source| StorageError::Io {
                path: data_dir.clone(),
                source,
            })?;

        Ok(Self { data_dir })
    }

    /// Directory this store writes to.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Resolve the file for `key`. Keys are limited to ASCII
    /// alphanumerics, `_` and `-` so they cannot escape the directory.
    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.data_dir.join(format!("{key}.kv")))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(key, "No stored value");
                Ok(None)
            }
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    #[instrument(skip(self, value), fields(bytes = value.len()))]
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let tmp_path = path.with_extension("kv.tmp");

        // Write to tmp file
        fs::write(&tmp_path, value)
            .await
            .map_err(|source| StorageError::Io {
                path: tmp_path.clone(),
                source,
            })?;

        // Atomic rename
        fs::rename(&tmp_path, &path)
            .await
            .map_err(|source| StorageError::Io {
                path: path.clone(),
                source,
            })?;

        debug!(path = %path.display(), "Value saved");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    async fn is_healthy(&self) -> bool {
        let test_path = self.data_dir.join(".health_check");
        let result = fs::write(&test_path, b"ok").await;
        let _ = fs::remove_file(&test_path).await;
        result.is_ok()
    }
}
