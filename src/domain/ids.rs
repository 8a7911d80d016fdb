//! Timestamp-based record identifiers.
//!
//! Loans, payments and users are keyed by the decimal string of the Unix
//! millisecond at which they were created. Two records created within
//! the same millisecond get consecutive values instead of colliding.

use std::sync::atomic::{AtomicI64, Ordering};

/// Last millisecond of year 9999. Stored ids above this cannot have
/// come from a clock, so they are never tracked and never reissued.
pub const MAX_TRACKED_ID: i64 = 253_402_300_799_999;

/// Issues strictly increasing millisecond ids.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicI64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id for a record created at `now_ms`.
    pub fn next_id(&self, now_ms: i64) -> String {
        let prev = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now_ms.max(last.saturating_add(1)))
            })
            .unwrap_or_else(|last| last);
        now_ms.max(prev.saturating_add(1)).to_string()
    }

    /// Records an id already in use so it is never issued again.
    ///
    /// Non-numeric ids (e.g. `"p1"` from the demo data) and values
    /// above `MAX_TRACKED_ID` are ignored.
    pub fn observe(&self, id: &str) {
        if let Some(value) = id.parse::<i64>().ok().filter(|v| *v <= MAX_TRACKED_ID) {
            self.last.fetch_max(value, Ordering::SeqCst);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uses_timestamp() {
        let ids = IdGenerator::new();
        assert_eq!(ids.next_id(1_700_000_000_000), "1700000000000");
    }

    #[test]
    fn test_same_millisecond_bumps() {
        let ids = IdGenerator::new();
        assert_eq!(ids.next_id(1000), "1000");
        assert_eq!(ids.next_id(1000), "1001");
        assert_eq!(ids.next_id(1000), "1002");
        assert_eq!(ids.next_id(5000), "5000");
    }

    #[test]
    fn test_observed_ids_are_skipped() {
        let ids = IdGenerator::new();
        ids.observe("2000");
        ids.observe("p1");
        assert_eq!(ids.next_id(2000), "2001");
        assert_eq!(ids.next_id(1500), "2002");
    }

    #[test]
    fn test_out_of_range_ids_are_not_tracked() {
        let ids = IdGenerator::new();
        ids.observe(&i64::MAX.to_string());
        ids.observe("99999999999999999999");
        assert_eq!(ids.next_id(1_700_000_000_000), "1700000000000");

        ids.observe(&MAX_TRACKED_ID.to_string());
        assert_eq!(ids.next_id(1_700_000_000_000), (MAX_TRACKED_ID + 1).to_string());
    }

    #[test]
    fn test_clock_at_ceiling_does_not_overflow() {
        let ids = IdGenerator::new();
        assert_eq!(ids.next_id(i64::MAX), i64::MAX.to_string());
        assert_eq!(ids.next_id(i64::MAX), i64::MAX.to_string());
    }
}
