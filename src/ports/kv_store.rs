//! Key-Value Store Port - Document Persistence Interface
//!
//! Every store in the crate persists through this trait: one text value
//! per string key, read and written whole. Structured values go through
//! `read_json` / `write_json`; flags and preference names are stored as
//! raw strings.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Well-known keys of the persisted layout.
pub mod keys {
  /// JSON array of user records.
  pub const USERS: &str = "users";
  /// JSON array of loans with nested payments.
  pub const LOANS: &str = "loans";
  /// JSON object of the logged-in user (no password).
  pub const CURRENT_USER: &str = "currentUser";
  /// Literal `"true"` when biometric login is enabled.
  pub const BIOMETRIC_ENABLED: &str = "biometricEnabled";
  /// Selected theme identifier.
  pub const THEME_NAME: &str = "themeName";
}

/// Failures of the persistence layer.
#[derive(Debug, Error)]
pub enum StorageError {
  #[error("I/O error on {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("invalid storage key: {0:?}")]
  InvalidKey(String),

  #[error("failed to encode value for key {key}: {source}")]
  Encode {
    key: String,
    #[source]
    source: serde_json::Error,
  },

  #[error("failed to decode value for key {key}: {source}")]
  Decode {
    key: String,
    #[source]
    source: serde_json::Error,
  },

  #[error("storage backend unavailable: {0}")]
  Unavailable(String),
}

/// Trait for string-keyed document stores.
///
/// Implementations must make `set` all-or-nothing: after a failed
/// write, `get` returns either the old value or the new one, never a
/// partial document.
#[async_trait]
pub trait KeyValueStore: Send + Sync + 'static {
  /// Read the value stored under `key`, or `None` if absent.
  async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

  /// Store `value` under `key`, replacing any previous value.
  async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

  /// Delete `key`. Removing an absent key succeeds.
  async fn remove(&self, key: &str) -> Result<(), StorageError>;

  /// Check the backend is reachable and writable.
  async fn is_healthy(&self) -> bool;
}

/// Read and deserialize the JSON document under `key`.
pub async fn read_json<T, S>(store: &S, key: &str) -> Result<Option<T>, StorageError>
where
  T: DeserializeOwned,
  S: KeyValueStore + ?Sized,
{
  let Some(text) = store.get(key).await? else {
    return Ok(None);
  };
  serde_json::from_str(&text)
    .map(Some)
    .map_err(|source| StorageError::Decode {
      key: key.to_string(),
      source,
    })
}

/// Serialize `value` as JSON and store it under `key`.
pub async fn write_json<T, S>(store: &S, key: &str, value: &T) -> Result<(), StorageError>
where
  T: Serialize + ?Sized + Sync,
  S: KeyValueStore + ?Sized,
{
  let text = serde_json::to_string(value).map_err(|source| StorageError::Encode {
    key: key.to_string(),
    source,
  })?;
  store.set(key, &text).await
}
