//! Text and JSON rendering for command results.

use lazytask_core::{format_calendar_date, ReconcileSummary, Task, TaskStatus};
use serde::Serialize;

/// One line per task: status box, due date with weekday, title, metadata, id.
pub fn task_line(task: &Task) -> String {
    let check = match task.status {
        TaskStatus::Pending => "[ ]",
        TaskStatus::Completed => "[x]",
    };
    format!(
        "{check} {} {}  {}  ({}, {}, {})  {}",
        format_calendar_date(task.due_date),
        task.due_date.format("%a"),
        task.title,
        task.category.label(),
        task.priority.as_str(),
        task.recurrence.label(),
        task.id
    )
}

pub fn task_list(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No tasks.\n".to_string();
    }
    let mut rendered = String::new();
    for task in tasks {
        rendered.push_str(&task_line(task));
        rendered.push('\n');
    }
    rendered
}

pub fn reconcile_summary(summary: &ReconcileSummary) -> String {
    format!(
        "Reconciled {} task(s); {} recurring task(s) advanced.\n",
        summary.total, summary.advanced
    )
}

/// Pretty JSON followed by a newline.
pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value)
        .map(|mut rendered| {
            rendered.push('\n');
            rendered
        })
        .map_err(|err| format!("json encoding failed: {err}"))
}
