//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `loansync.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::AppConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig> {
  let path = path.as_ref();

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config = parse_config(&content)?;

  info!(
    path = %path.display(),
    data_dir = %config.storage.data_dir,
    seed_demo_data = config.ledger.seed_demo_data,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Load `path` if it exists, otherwise fall back to defaults.
///
/// Returns whether the file was found alongside the config.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<(AppConfig, bool)> {
  let path = path.as_ref();
  if path.exists() {
    load_config(path).map(|config| (config, true))
  } else {
    Ok((AppConfig::default(), false))
  }
}

/// Parse and validate configuration text.
pub fn parse_config(content: &str) -> Result<AppConfig> {
  let config: AppConfig =
    toml::from_str(content).with_context(|| "Failed to parse loansync.toml")?;
  validate_config(&config)?;
  Ok(config)
}

/// Validate all configuration parameters.
fn validate_config(config: &AppConfig) -> Result<()> {
  anyhow::ensure!(
    !config.app.name.trim().is_empty(),
    "app.name must not be empty"
  );
  anyhow::ensure!(
    LOG_LEVELS.contains(&config.app.log_level.to_lowercase().as_str()),
    "app.log_level must be one of {:?}, got {:?}",
    LOG_LEVELS,
    config.app.log_level
  );

  anyhow::ensure!(
    !config.storage.data_dir.trim().is_empty(),
    "storage.data_dir must not be empty"
  );

  anyhow::ensure!(
    config.ledger.upcoming_window_days <= 366,
    "ledger.upcoming_window_days must be at most 366, got {}",
    config.ledger.upcoming_window_days
  );
  anyhow::ensure!(
    (1..=60).contains(&config.ledger.projection_months),
    "ledger.projection_months must be in [1, 60], got {}",
    config.ledger.projection_months
  );

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_load_nonexistent_file() {
    let result = load_config("nonexistent.toml");
    assert!(result.is_err());
  }

  #[test]
  fn test_missing_file_falls_back_to_defaults() {
    let (config, found) = load_config_or_default("nonexistent.toml").unwrap();
    assert!(!found);
    assert_eq!(config.storage.data_dir, "data");
    assert!(config.ledger.seed_demo_data);
  }

  #[test]
  fn test_empty_config_uses_defaults() {
    let config = parse_config("").unwrap();
    assert_eq!(config.app.name, "loansync");
    assert_eq!(config.app.log_level, "info");
    assert!(!config.app.json_logs);
    assert_eq!(config.ledger.upcoming_window_days, 7);
    assert_eq!(config.ledger.projection_months, 6);
  }

  #[test]
  fn test_partial_config() {
    let config = parse_config(
      r#"
      [storage]
      data_dir = "/var/lib/loansync"

      [ledger]
      seed_demo_data = false
      upcoming_window_days = 30
      "#,
    )
    .unwrap();
    assert_eq!(config.storage.data_dir, "/var/lib/loansync");
    assert!(!config.ledger.seed_demo_data);
    assert_eq!(config.ledger.upcoming_window_days, 30);
    assert_eq!(config.app.log_level, "info");
  }

  #[test]
  fn test_rejects_bad_log_level() {
    let err = parse_config("[app]\nlog_level = \"loud\"").unwrap_err();
    assert!(err.to_string().contains("log_level"));
  }

  #[test]
  fn test_rejects_empty_data_dir() {
    assert!(parse_config("[storage]\ndata_dir = \"  \"").is_err());
  }

  #[test]
  fn test_rejects_zero_projection() {
    assert!(parse_config("[ledger]\nprojection_months = 0").is_err());
  }

  #[test]
  fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("loansync.toml");
    std::fs::write(&path, "[app]\nname = \"home\"\njson_logs = true\n").unwrap();

    let config = load_config(&path).unwrap();
    assert_eq!(config.app.name, "home");
    assert!(config.app.json_logs);
  }
}
