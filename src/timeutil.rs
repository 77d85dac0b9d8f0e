//! Shared calendar arithmetic.
//!
//! Both the statistics engine and the productivity aggregator derive their
//! windows from here so the two cannot drift apart on month/year boundaries.

use chrono::{DateTime, Duration, Months, NaiveTime, Utc};

use crate::model::Period;

/// Midnight (UTC) at the start of `now`'s calendar day.
pub fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Inclusive lower bound of the lookback window for `period`, evaluated
/// at `now`.
///
/// `Today` snaps to the start of the calendar day; `Week` is a plain
/// 7-day offset; `Month` and `Year` use calendar arithmetic (the day of
/// month is clamped when the target month is shorter).
pub fn window_start(period: Period, now: DateTime<Utc>) -> DateTime<Utc> {
    match period {
        Period::Today => start_of_day(now),
        Period::Week => now - Duration::days(7),
        Period::Month => now
            .checked_sub_months(Months::new(1))
            .unwrap_or(now - Duration::days(30)),
        Period::Year => now
            .checked_sub_months(Months::new(12))
            .unwrap_or(now - Duration::days(365)),
    }
}

/// Whole calendar days separating two instants' days, from `from` to `to`.
pub fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (start_of_day(to) - start_of_day(from)).num_days()
}
