//! Recurrence scheduling engine.
//!
//! # Responsibility
//! - Locate ordinal Sundays and nearest Sundays on the local calendar.
//! - Advance recurring tasks to their next valid occurrence.
//! - Reconcile task collections whose due dates have lapsed.
//!
//! # Invariants
//! - Every function is a pure computation over explicit inputs; `today` is
//!   always a parameter and never read from the clock here.
//! - A recurring task's due date produced by this module is `>= today`.
//!
//! Dependency order: `nth_sunday` and `next_sunday` are leaves, `advance`
//! builds on both, `reconcile` builds on `advance`.

use crate::model::date::{format_calendar_date, CalendarDate};
use crate::model::recurrence::SundayOrdinal;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod advance;
pub mod next_sunday;
pub mod nth_sunday;
pub mod reconcile;

pub use advance::{advance, MAX_MONTHS_SCANNED};
pub use next_sunday::{next_sunday_on_or_after, next_sunday_strictly_after};
pub use nth_sunday::{nth_sunday_of_month, nth_weekday_of_month};
pub use reconcile::{
    apply_edit, initial_due_date, is_lapsed, reconcile, reconcile_task, toggle_completion,
};

pub type ScheduleResult<T> = Result<T, ScheduleError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// `advance` was called for a one-time rule.
    NotRecurring,
    /// A one-time task was created without a due date.
    MissingDueDate,
    /// The monthly scan found no acceptable occurrence within its bound.
    NoOccurrence {
        ordinal: SundayOrdinal,
        from: CalendarDate,
        months_scanned: u32,
    },
}

impl Display for ScheduleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotRecurring => write!(f, "one-time tasks have no next occurrence"),
            Self::MissingDueDate => write!(f, "one-time tasks require a due date"),
            Self::NoOccurrence {
                ordinal,
                from,
                months_scanned,
            } => write!(
                f,
                "no {} sunday found within {months_scanned} months from {}",
                ordinal.as_str(),
                format_calendar_date(*from)
            ),
        }
    }
}

impl Error for ScheduleError {}
