//! Preferences Use Case - Persisted Theme Choice

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::user::ThemeName;
use crate::ports::kv_store::{KeyValueStore, StorageError, keys};

/// Reads and writes the `"themeName"` preference.
pub struct Preferences<S: KeyValueStore> {
  store: Arc<S>,
}

impl<S: KeyValueStore> Preferences<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self { store }
  }

  /// The saved theme, or `system` when unset or unrecognised.
  pub async fn theme_name(&self) -> Result<ThemeName, StorageError> {
    let Some(raw) = self.store.get(keys::THEME_NAME).await? else {
      return Ok(ThemeName::default());
    };
    Ok(raw.parse().unwrap_or_else(|_| {
      warn!(stored = %raw, "Unknown theme name, using default");
      ThemeName::default()
    }))
  }

  pub async fn set_theme_name(&self, theme: ThemeName) -> Result<(), StorageError> {
    self.store.set(keys::THEME_NAME, theme.as_str()).await?;
    info!(theme = %theme, "Theme preference saved");
    Ok(())
  }
}
