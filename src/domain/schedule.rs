//! Calendar arithmetic for EMI schedules.
//!
//! All schedule math works on calendar dates (`NaiveDate`), never on
//! instants, so a due date means the whole day in UTC.

use chrono::{Datelike, Months, NaiveDate};

/// Advances `date` by `months` calendar months.
///
/// Clamps to the last day of the target month when the day does not
/// exist there (Jan 31 + 1 month = Feb 28/29). Returns `None` only when
/// the result falls outside chrono's representable range.
pub fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}

/// Whole days from `today` until `due`. Negative when `due` has passed.
///
/// Equivalent to the ceiling of the fractional day difference between
/// any instant during `today` and midnight at the start of `due`.
pub fn days_until(due: NaiveDate, today: NaiveDate) -> i64 {
    due.signed_duration_since(today).num_days()
}

/// Number of full calendar months between two dates.
///
/// Negative when `later` precedes `earlier`. A partial trailing month
/// does not count, except that landing on the last day of a shorter
/// month completes it (Jan 31 → Feb 28 is one month).
pub fn months_between(later: NaiveDate, earlier: NaiveDate) -> i32 {
    if later < earlier {
        return -months_between(earlier, later);
    }

    let mut months = (later.year() - earlier.year()) * 12 + later.month() as i32
        - earlier.month() as i32;
    if later.day() < earlier.day() && !is_last_day_of_month(later) {
        months -= 1;
    }
    months
}

/// True when `date` is the final day of its month.
pub fn is_last_day_of_month(date: NaiveDate) -> bool {
    date.succ_opt().is_none_or(|next| next.month() != date.month())
}
