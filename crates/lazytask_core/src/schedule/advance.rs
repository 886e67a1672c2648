//! Next-occurrence computation for recurring rules.
//!
//! # Invariants
//! - The result is never earlier than `today`.
//! - With a reference date the result is strictly later than it, so the
//!   occurrence that triggered the computation is never returned again.

use super::next_sunday::{next_sunday_on_or_after, next_sunday_strictly_after};
use super::nth_sunday::nth_sunday_of_month;
use super::{ScheduleError, ScheduleResult};
use crate::model::date::CalendarDate;
use crate::model::recurrence::{RecurrenceRule, SundayOrdinal};
use chrono::Datelike;

/// Upper bound on months inspected by one monthly advance. Every month has at
/// least four Sundays, so hitting it means an invariant broke elsewhere.
pub const MAX_MONTHS_SCANNED: u32 = 24;

/// Computes the next due date for `rule`.
///
/// `reference` is the occurrence just completed, edited or expired; `None`
/// means a brand-new task scheduled from `today`.
///
/// # Errors
/// - `NotRecurring` when called with `RecurrenceRule::OneTime`.
/// - `NoOccurrence` when the monthly scan exceeds `MAX_MONTHS_SCANNED`.
pub fn advance(
    rule: RecurrenceRule,
    reference: Option<CalendarDate>,
    today: CalendarDate,
) -> ScheduleResult<CalendarDate> {
    match rule {
        RecurrenceRule::OneTime => Err(ScheduleError::NotRecurring),
        RecurrenceRule::WeeklySunday => Ok(advance_weekly(reference, today)),
        RecurrenceRule::MonthlyNthSunday(ordinal) => advance_monthly(ordinal, reference, today),
    }
}

fn advance_weekly(reference: Option<CalendarDate>, today: CalendarDate) -> CalendarDate {
    let candidate = match reference {
        Some(reference) => next_sunday_strictly_after(reference),
        None => next_sunday_on_or_after(today),
    };
    if candidate >= today {
        return candidate;
    }
    // Stepping a Sunday forward by whole weeks first reaches `today` or later
    // at the Sunday on/after `today`.
    next_sunday_on_or_after(today)
}

fn advance_monthly(
    ordinal: SundayOrdinal,
    reference: Option<CalendarDate>,
    today: CalendarDate,
) -> ScheduleResult<CalendarDate> {
    let anchor = reference.unwrap_or(today);
    // Months before today's month only hold dates earlier than today.
    let mut cursor = MonthCursor::of(anchor).max(MonthCursor::of(today));

    for _ in 0..MAX_MONTHS_SCANNED {
        if let Some(candidate) = nth_sunday_of_month(cursor.year, cursor.month, ordinal) {
            let after_reference = reference.map_or(true, |reference| candidate > reference);
            if candidate >= today && after_reference {
                return Ok(candidate);
            }
        }
        cursor = cursor.next();
    }

    Err(ScheduleError::NoOccurrence {
        ordinal,
        from: anchor,
        months_scanned: MAX_MONTHS_SCANNED,
    })
}

/// Year/month pair; derived ordering compares year first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct MonthCursor {
    year: i32,
    month: u32,
}

impl MonthCursor {
    fn of(date: CalendarDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}
