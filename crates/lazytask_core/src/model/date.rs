//! Whole-day calendar dates and their wire codec.
//!
//! # Responsibility
//! - Name the date type consumed by the scheduling engine.
//! - Parse and format the strict `YYYY-MM-DD` representation used by storage
//!   and command-line boundaries.
//!
//! # Invariants
//! - Parsing accepts only a four-digit year with zero-padded month and day.
//! - Every accepted string formats back to itself.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// A calendar day with no time-of-day component.
pub type CalendarDate = NaiveDate;

const CALENDAR_DATE_FORMAT: &str = "%Y-%m-%d";

static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid iso date regex"));

/// Rejection reason for a date string at a storage or input boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateParseError {
    /// Input does not have the `YYYY-MM-DD` shape.
    Malformed(String),
    /// Input has the right shape but names no real day (e.g. `2024-02-30`).
    InvalidDay(String),
}

impl Display for DateParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(value) => {
                write!(f, "invalid date `{value}`: expected YYYY-MM-DD")
            }
            Self::InvalidDay(value) => write!(f, "invalid date `{value}`: no such calendar day"),
        }
    }
}

impl Error for DateParseError {}

/// Parses a strict ISO 8601 date-only string.
///
/// Surrounding whitespace is ignored.
pub fn parse_calendar_date(value: &str) -> Result<CalendarDate, DateParseError> {
    let trimmed = value.trim();
    if !ISO_DATE_RE.is_match(trimmed) {
        return Err(DateParseError::Malformed(trimmed.to_string()));
    }
    NaiveDate::parse_from_str(trimmed, CALENDAR_DATE_FORMAT)
        .map_err(|_| DateParseError::InvalidDay(trimmed.to_string()))
}

/// Formats a date as `YYYY-MM-DD`.
pub fn format_calendar_date(date: CalendarDate) -> String {
    date.format(CALENDAR_DATE_FORMAT).to_string()
}

/// Serde adapter for `CalendarDate` fields using the strict codec.
pub mod iso {
    use super::{format_calendar_date, parse_calendar_date, CalendarDate};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &CalendarDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_calendar_date(*date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<CalendarDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_calendar_date(&raw).map_err(serde::de::Error::custom)
    }
}
