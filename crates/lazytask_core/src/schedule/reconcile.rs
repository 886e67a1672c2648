//! Task-level scheduling transitions.
//!
//! # Responsibility
//! - Bring lapsed recurring tasks forward to the present (load-time pass).
//! - Define the completion-toggle and edit transitions for recurring tasks.
//!
//! # Invariants
//! - Inputs are consumed and new values returned; no shared state is touched.
//! - After any transition a recurring task is `Pending`.
//! - Reconciling twice with the same `today` changes nothing the second time.

use super::advance::advance;
use super::{ScheduleError, ScheduleResult};
use crate::model::date::CalendarDate;
use crate::model::recurrence::RecurrenceRule;
use crate::model::task::{Task, TaskStatus};

/// Whether `task` is recurring and its due date is strictly before `today`.
pub fn is_lapsed(task: &Task, today: CalendarDate) -> bool {
    task.is_recurring() && task.due_date < today
}

/// Re-dates every lapsed recurring task, preserving order.
pub fn reconcile(tasks: Vec<Task>, today: CalendarDate) -> ScheduleResult<Vec<Task>> {
    tasks
        .into_iter()
        .map(|task| reconcile_task(task, today))
        .collect()
}

/// Reconciles a single task; non-lapsed tasks pass through unchanged.
pub fn reconcile_task(task: Task, today: CalendarDate) -> ScheduleResult<Task> {
    if !is_lapsed(&task, today) {
        return Ok(task);
    }
    reschedule(task, today)
}

/// Applies a completion toggle.
///
/// Recurring tasks are never marked completed: the current occurrence is
/// consumed and the task moves to its next due date. One-time tasks flip
/// between pending and completed without a date change.
pub fn toggle_completion(task: Task, today: CalendarDate) -> ScheduleResult<Task> {
    if task.is_recurring() {
        return reschedule(task, today);
    }
    Ok(Task {
        status: task.status.toggled(),
        ..task
    })
}

/// Applies the edit transition to a task whose schedule fields were
/// resubmitted.
///
/// For recurring tasks the submitted due date is treated as the reference
/// occurrence and the next one is computed; one-time tasks keep the
/// submitted date verbatim.
pub fn apply_edit(task: Task, today: CalendarDate) -> ScheduleResult<Task> {
    if !task.is_recurring() {
        return Ok(task);
    }
    reschedule(task, today)
}

/// Resolves the due date of a task being created.
///
/// # Errors
/// - `MissingDueDate` when a one-time task has no user-entered date.
pub fn initial_due_date(
    rule: RecurrenceRule,
    requested: Option<CalendarDate>,
    today: CalendarDate,
) -> ScheduleResult<CalendarDate> {
    if rule.is_recurring() {
        return advance(rule, None, today);
    }
    requested.ok_or(ScheduleError::MissingDueDate)
}

fn reschedule(task: Task, today: CalendarDate) -> ScheduleResult<Task> {
    let due_date = advance(task.recurrence, Some(task.due_date), today)?;
    Ok(Task {
        due_date,
        status: TaskStatus::Pending,
        ..task
    })
}
