//! Core domain logic for LazyTask.
//! This crate owns the recurrence scheduling engine and every business
//! invariant around task due dates.

pub mod clock;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod schedule;
pub mod service;

pub use clock::local_today;
pub use logging::{init_logging, logging_status, LogLevel, LoggingError};
pub use model::date::{format_calendar_date, parse_calendar_date, CalendarDate, DateParseError};
pub use model::recurrence::{RecurrenceKind, RecurrenceRule, RecurrenceRuleError, SundayOrdinal};
pub use model::task::{
    Task, TaskCategory, TaskId, TaskPriority, TaskStatus, TaskValidationError, UnknownValueError,
};
pub use repo::task_repo::{RepoError, RepoResult, SqliteTaskRepository, TaskRepository};
pub use schedule::{advance, reconcile, ScheduleError, ScheduleResult};
pub use service::task_query::{TaskListQuery, TaskSortOrder};
pub use service::task_service::{
    NewTask, ReconcileSummary, TaskEdit, TaskService, TaskServiceError, TaskServiceResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
