//! Recurrence rules for tasks.
//!
//! # Responsibility
//! - Define the closed set of supported repetition patterns.
//! - Validate rules at construction and at the wire boundary.
//!
//! # Invariants
//! - An ordinal exists if and only if the rule is `MonthlyNthSunday`.
//! - Only the first three Sundays of a month can be targeted.
//!
//! # Wire format
//! `{ "type": "one-time" | "weekly-sunday" | "monthly-nth-sunday", "ordinal"?: "first" | "second" | "third" }`

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Which Sunday of the month a monthly rule targets, counted from day 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SundayOrdinal {
    First = 1,
    Second = 2,
    Third = 3,
}

impl SundayOrdinal {
    pub const ALL: [SundayOrdinal; 3] = [Self::First, Self::Second, Self::Third];

    /// 1-based position of the targeted Sunday within its month.
    pub fn position(self) -> u32 {
        self as u32
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Second => "second",
            Self::Third => "third",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::First => "First Sunday",
            Self::Second => "Second Sunday",
            Self::Third => "Third Sunday",
        }
    }
}

impl TryFrom<u32> for SundayOrdinal {
    type Error = RecurrenceRuleError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::First),
            2 => Ok(Self::Second),
            3 => Ok(Self::Third),
            other => Err(RecurrenceRuleError::UnsupportedOrdinal(other.to_string())),
        }
    }
}

/// Accepts `first|second|third` (case-insensitive) or `1|2|3`.
impl FromStr for SundayOrdinal {
    type Err = RecurrenceRuleError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "first" | "1" => Ok(Self::First),
            "second" | "2" => Ok(Self::Second),
            "third" | "3" => Ok(Self::Third),
            _ => Err(RecurrenceRuleError::UnsupportedOrdinal(
                value.trim().to_string(),
            )),
        }
    }
}

/// Discriminant of a `RecurrenceRule`, without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecurrenceKind {
    OneTime,
    WeeklySunday,
    MonthlyNthSunday,
}

impl RecurrenceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OneTime => "one-time",
            Self::WeeklySunday => "weekly-sunday",
            Self::MonthlyNthSunday => "monthly-nth-sunday",
        }
    }
}

impl FromStr for RecurrenceKind {
    type Err = RecurrenceRuleError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "one-time" | "once" => Ok(Self::OneTime),
            "weekly-sunday" | "weekly" => Ok(Self::WeeklySunday),
            "monthly-nth-sunday" | "monthly" => Ok(Self::MonthlyNthSunday),
            _ => Err(RecurrenceRuleError::UnknownKind(value.trim().to_string())),
        }
    }
}

/// How a task repeats.
///
/// Serialized through a tagged `{ type, ordinal? }` record; deserialization
/// goes through [`RecurrenceRule::from_parts`] so invalid combinations never
/// reach the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "RecurrenceRuleWire", into = "RecurrenceRuleWire")]
pub enum RecurrenceRule {
    /// Never repeats; the due date is user-entered.
    #[default]
    OneTime,
    /// Every Sunday.
    WeeklySunday,
    /// The given Sunday of every month.
    MonthlyNthSunday(SundayOrdinal),
}

impl RecurrenceRule {
    /// Builds a rule from its textual kind and optional ordinal.
    ///
    /// # Errors
    /// - `UnknownKind` for an unrecognized kind.
    /// - `MissingOrdinal` when a monthly rule has no ordinal.
    /// - `UnsupportedOrdinal` when the ordinal is outside first..third.
    /// - `UnexpectedOrdinal` when a non-monthly rule carries an ordinal.
    pub fn from_parts(kind: &str, ordinal: Option<&str>) -> Result<Self, RecurrenceRuleError> {
        let kind = kind.parse::<RecurrenceKind>()?;
        match (kind, ordinal) {
            (RecurrenceKind::MonthlyNthSunday, Some(raw)) => {
                Ok(Self::MonthlyNthSunday(raw.parse()?))
            }
            (RecurrenceKind::MonthlyNthSunday, None) => Err(RecurrenceRuleError::MissingOrdinal),
            (other, Some(_)) => Err(RecurrenceRuleError::UnexpectedOrdinal(other)),
            (RecurrenceKind::OneTime, None) => Ok(Self::OneTime),
            (RecurrenceKind::WeeklySunday, None) => Ok(Self::WeeklySunday),
        }
    }

    pub fn kind(self) -> RecurrenceKind {
        match self {
            Self::OneTime => RecurrenceKind::OneTime,
            Self::WeeklySunday => RecurrenceKind::WeeklySunday,
            Self::MonthlyNthSunday(_) => RecurrenceKind::MonthlyNthSunday,
        }
    }

    pub fn ordinal(self) -> Option<SundayOrdinal> {
        match self {
            Self::MonthlyNthSunday(ordinal) => Some(ordinal),
            _ => None,
        }
    }

    /// Whether the scheduling engine owns this task's due date.
    pub fn is_recurring(self) -> bool {
        !matches!(self, Self::OneTime)
    }

    /// Human-readable description for listings.
    pub fn label(self) -> String {
        match self {
            Self::OneTime => "One-time".to_string(),
            Self::WeeklySunday => "Every Sunday".to_string(),
            Self::MonthlyNthSunday(ordinal) => format!("{} of month", ordinal.label()),
        }
    }
}

/// Rejected recurrence rule configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecurrenceRuleError {
    UnknownKind(String),
    MissingOrdinal,
    UnsupportedOrdinal(String),
    UnexpectedOrdinal(RecurrenceKind),
}

impl Display for RecurrenceRuleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownKind(value) => write!(
                f,
                "unknown recurrence type `{value}`; expected one-time|weekly-sunday|monthly-nth-sunday"
            ),
            Self::MissingOrdinal => write!(f, "monthly-nth-sunday recurrence requires an ordinal"),
            Self::UnsupportedOrdinal(value) => write!(
                f,
                "unsupported recurrence ordinal `{value}`; expected first|second|third"
            ),
            Self::UnexpectedOrdinal(kind) => write!(
                f,
                "recurrence type `{}` does not take an ordinal",
                kind.as_str()
            ),
        }
    }
}

impl Error for RecurrenceRuleError {}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RecurrenceRuleWire {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ordinal: Option<String>,
}

impl TryFrom<RecurrenceRuleWire> for RecurrenceRule {
    type Error = RecurrenceRuleError;

    fn try_from(value: RecurrenceRuleWire) -> Result<Self, Self::Error> {
        Self::from_parts(&value.kind, value.ordinal.as_deref())
    }
}

impl From<RecurrenceRule> for RecurrenceRuleWire {
    fn from(value: RecurrenceRule) -> Self {
        Self {
            kind: value.kind().as_str().to_string(),
            ordinal: value.ordinal().map(|ordinal| ordinal.as_str().to_string()),
        }
    }
}
