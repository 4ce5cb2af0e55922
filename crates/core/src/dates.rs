//! Calendar arithmetic. Every date in the engine is date-only and
//! timezone-naive; treat them all as UTC midnights and the arithmetic
//! below stays exact across any wall-clock oddity.

use chrono::NaiveDate;

/// Signed whole days from `a` to `b`, positive when `b` is later.
pub fn days_between(a: NaiveDate, b: NaiveDate) -> i64 {
    (b - a).num_days()
}

/// Inclusive symmetric window test: is `d` within `days` of `center`?
pub fn within_window(d: NaiveDate, center: NaiveDate, days: i64) -> bool {
    days_between(center, d).abs() <= days
}
