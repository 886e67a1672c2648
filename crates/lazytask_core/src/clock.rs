//! Host calendar access.
//!
//! The scheduling engine never reads the clock itself; callers capture
//! `today` here once per logical pass and thread it through.

use crate::model::date::CalendarDate;
use chrono::Local;

/// Returns the current date on the host's local calendar.
pub fn local_today() -> CalendarDate {
    Local::now().date_naive()
}
