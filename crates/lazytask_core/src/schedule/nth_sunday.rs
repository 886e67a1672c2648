//! Ordinal weekday lookup within a calendar month.

use crate::model::date::CalendarDate;
use crate::model::recurrence::SundayOrdinal;
use chrono::{Datelike, NaiveDate, Weekday};

/// Returns the `n`-th (1-based) `weekday` of `year`/`month`.
///
/// Scans day 1 through the last day of the month in order. Returns `None`
/// when the month has fewer than `n` such weekdays, when `n == 0`, or when
/// `month` is outside `1..=12`.
pub fn nth_weekday_of_month(
    year: i32,
    month: u32,
    weekday: Weekday,
    n: u32,
) -> Option<CalendarDate> {
    let index = usize::try_from(n.checked_sub(1)?).ok()?;
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    first
        .iter_days()
        .take_while(|day| day.month() == month)
        .filter(|day| day.weekday() == weekday)
        .nth(index)
}

/// Returns the date of the `ordinal` Sunday of `year`/`month`.
///
/// `None` is an expected outcome for callers that roll forward month by month.
pub fn nth_sunday_of_month(year: i32, month: u32, ordinal: SundayOrdinal) -> Option<CalendarDate> {
    nth_weekday_of_month(year, month, Weekday::Sun, ordinal.position())
}
