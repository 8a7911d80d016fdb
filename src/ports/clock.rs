//! Clock Port - Source of "now"
//!
//! Payment dates, due-date windows and record ids all depend on the
//! current time. Use cases read it through this trait so tests can pin
//! a date.

use chrono::{DateTime, NaiveDate, Utc};

/// Trait for wall-clock providers.
pub trait Clock: Send + Sync + 'static {
  /// Current instant.
  fn now(&self) -> DateTime<Utc>;

  /// Current calendar date in UTC.
  fn today(&self) -> NaiveDate {
    self.now().date_naive()
  }

  /// Current Unix time in milliseconds (record id source).
  fn now_millis(&self) -> i64 {
    self.now().timestamp_millis()
  }
}
