//! Configuration Module - TOML-based Application Configuration
//!
//! Loads and validates configuration from `loansync.toml`. Every
//! section and field has a default, so a missing or partial file still
//! yields a runnable setup.

pub mod loader;

use serde::Deserialize;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
  /// Identity and logging.
  pub app: AppSection,
  /// Where persisted documents live.
  pub storage: StorageConfig,
  /// Loan ledger behaviour.
  pub ledger: LedgerConfig,
}

/// Application identity and logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppSection {
  /// Human-readable instance name.
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  pub log_level: String,
  /// Emit JSON log lines instead of human-readable output.
  pub json_logs: bool,
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
  /// Directory for the per-key documents.
  pub data_dir: String,
}

/// Loan ledger configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
  /// Write the demo loans when no ledger has been persisted yet.
  pub seed_demo_data: bool,
  /// Look-ahead window for the upcoming payments summary (days).
  pub upcoming_window_days: u32,
  /// Months covered by the EMI projection.
  pub projection_months: u32,
}

impl Default for AppSection {
  fn default() -> Self {
    Self {
      name: default_name(),
      log_level: default_log_level(),
      json_logs: false,
    }
  }
}

impl Default for StorageConfig {
  fn default() -> Self {
    Self {
      data_dir: default_data_dir(),
    }
  }
}

impl Default for LedgerConfig {
  fn default() -> Self {
    Self {
      seed_demo_data: true,
      upcoming_window_days: default_upcoming_window(),
      projection_months: default_projection_months(),
    }
  }
}

// Default value functions

fn default_name() -> String {
  "loansync".to_string()
}

fn default_log_level() -> String {
  "info".to_string()
}

fn default_data_dir() -> String {
  "data".to_string()
}

const fn default_upcoming_window() -> u32 {
  7
}

const fn default_projection_months() -> u32 {
  6
}
