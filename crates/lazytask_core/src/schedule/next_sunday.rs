//! Nearest-Sunday lookups.
//!
//! Both functions are total over the supported calendar range and panic only
//! if the result would pass `NaiveDate::MAX`.

use crate::model::date::CalendarDate;
use chrono::{Datelike, Days};

/// Returns `date` when it is a Sunday, otherwise the following Sunday.
pub fn next_sunday_on_or_after(date: CalendarDate) -> CalendarDate {
    let days_ahead = (7 - date.weekday().num_days_from_sunday()) % 7;
    date + Days::new(u64::from(days_ahead))
}

/// Returns the first Sunday later than `date`; a Sunday maps to `date + 7`.
pub fn next_sunday_strictly_after(date: CalendarDate) -> CalendarDate {
    next_sunday_on_or_after(date + Days::new(1))
}

#[cfg(test)]
mod tests {
    use super::{next_sunday_on_or_after, next_sunday_strictly_after};
    use chrono::{Datelike, Days, NaiveDate, Weekday};

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn sunday_is_its_own_on_or_after() {
        assert_eq!(next_sunday_on_or_after(ymd(2024, 1, 7)), ymd(2024, 1, 7));
        assert_eq!(next_sunday_strictly_after(ymd(2024, 1, 7)), ymd(2024, 1, 14));
    }

    #[test]
    fn weekdays_move_to_the_coming_sunday() {
        // Monday through Saturday of the week ending 2024-01-14.
        for day in 8..=13 {
            assert_eq!(next_sunday_on_or_after(ymd(2024, 1, day)), ymd(2024, 1, 14));
            assert_eq!(next_sunday_strictly_after(ymd(2024, 1, day)), ymd(2024, 1, 14));
        }
    }

    #[test]
    fn crosses_month_and_year_boundaries() {
        assert_eq!(next_sunday_on_or_after(ymd(2024, 12, 30)), ymd(2025, 1, 5));
        assert_eq!(next_sunday_strictly_after(ymd(2024, 12, 29)), ymd(2025, 1, 5));
    }

    #[test]
    fn results_are_sundays_within_a_week() {
        let start = ymd(2023, 12, 1);
        for offset in 0..120 {
            let date = start + Days::new(offset);
            let on_or_after = next_sunday_on_or_after(date);
            let strictly_after = next_sunday_strictly_after(date);

            assert_eq!(on_or_after.weekday(), Weekday::Sun);
            assert_eq!(strictly_after.weekday(), Weekday::Sun);
            assert!(on_or_after >= date);
            assert!((on_or_after - date).num_days() <= 6);
            assert!(strictly_after > date);
            assert!((strictly_after - date).num_days() <= 7);
        }
    }
}
