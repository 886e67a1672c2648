//! Task use-case service.
//!
//! # Responsibility
//! - Route every due-date mutation through the scheduling engine (load,
//!   creation, edit, completion toggle).
//! - Provide plain CRUD entry points that bypass the engine.
//!
//! # Invariants
//! - `today` is captured by the caller once per action and passed in.
//! - A pass computes a new collection first and persists it in one write.
//! - Logs carry ids and counts only, never titles or descriptions.

use crate::model::date::{format_calendar_date, CalendarDate};
use crate::model::recurrence::RecurrenceRule;
use crate::model::task::{Task, TaskCategory, TaskId, TaskPriority};
use crate::repo::task_repo::{RepoError, TaskRepository};
use crate::schedule::{self, ScheduleError};
use crate::service::task_query::TaskListQuery;
use log::{error, info};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for task use-cases.
#[derive(Debug)]
pub enum TaskServiceError {
    /// Caller input violates a use-case precondition.
    InvalidInput(String),
    TaskNotFound(TaskId),
    Schedule(ScheduleError),
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::Schedule(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent task state: {details}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Schedule(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TaskServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::TaskNotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<ScheduleError> for TaskServiceError {
    fn from(value: ScheduleError) -> Self {
        match value {
            ScheduleError::MissingDueDate => {
                Self::InvalidInput("due date is required for one-time tasks".to_string())
            }
            other => Self::Schedule(other),
        }
    }
}

pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub category: TaskCategory,
    pub priority: TaskPriority,
    /// Required for one-time tasks; ignored for recurring ones.
    pub due_date: Option<CalendarDate>,
    pub recurrence: RecurrenceRule,
}

impl NewTask {
    pub fn new(title: impl Into<String>, recurrence: RecurrenceRule) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            category: TaskCategory::default(),
            priority: TaskPriority::default(),
            due_date: None,
            recurrence,
        }
    }
}

/// Partial edit. `None` leaves a field unchanged.
///
/// Submitting `due_date` or `recurrence` re-runs the edit transition; other
/// fields are plain metadata and never move the due date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskEdit {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<TaskCategory>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<CalendarDate>,
    pub recurrence: Option<RecurrenceRule>,
}

impl TaskEdit {
    pub fn touches_schedule(&self) -> bool {
        self.due_date.is_some() || self.recurrence.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileSummary {
    pub total: usize,
    pub advanced: usize,
}

/// Task service facade over repository implementations.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Load-time pass: brings every lapsed recurring task forward to `today`
    /// and writes the collection back when anything changed.
    pub fn reconcile_on_load(&self, today: CalendarDate) -> TaskServiceResult<ReconcileSummary> {
        let tasks = self.repo.load_tasks()?;
        self.reconcile_and_store(tasks, today, false)
    }

    /// Creates a task. Recurring tasks get a computed due date; one-time
    /// tasks require a user-entered one.
    pub fn create_task(&self, request: NewTask, today: CalendarDate) -> TaskServiceResult<Task> {
        let title = normalize_title(&request.title)?;
        let due_date = schedule::initial_due_date(request.recurrence, request.due_date, today)?;

        let mut task = Task::new(title, due_date, request.recurrence);
        task.description = request.description;
        task.category = request.category;
        task.priority = request.priority;

        let id = self.repo.create_task(&task)?;
        info!(
            "event=task_create module=service status=ok task_id={id} recurrence={} due_date={}",
            task.recurrence.kind().as_str(),
            format_calendar_date(task.due_date)
        );
        self.read_back(id, "created task not found in read-back")
    }

    /// Applies a partial edit.
    ///
    /// # Errors
    /// - `InvalidInput` for an empty edit or a blank title.
    /// - `TaskNotFound` when `id` does not exist.
    pub fn edit_task(
        &self,
        id: TaskId,
        edit: TaskEdit,
        today: CalendarDate,
    ) -> TaskServiceResult<Task> {
        if edit.is_empty() {
            return Err(TaskServiceError::InvalidInput(
                "edit does not change any field".to_string(),
            ));
        }
        let mut task = self.require(id)?;
        let touches_schedule = edit.touches_schedule();

        if let Some(title) = edit.title.as_deref() {
            task.title = normalize_title(title)?;
        }
        if let Some(description) = edit.description {
            task.description = description;
        }
        if let Some(category) = edit.category {
            task.category = category;
        }
        if let Some(priority) = edit.priority {
            task.priority = priority;
        }
        if touches_schedule {
            task.recurrence = edit.recurrence.unwrap_or(task.recurrence);
            task.due_date = edit.due_date.unwrap_or(task.due_date);
            task = schedule::apply_edit(task, today)?;
        }

        self.repo.update_task(&task)?;
        info!(
            "event=task_edit module=service status=ok task_id={id} rescheduled={touches_schedule} due_date={}",
            format_calendar_date(task.due_date)
        );
        Ok(task)
    }

    /// Toggles completion. Recurring tasks advance to their next occurrence
    /// and stay pending.
    pub fn toggle_completion(&self, id: TaskId, today: CalendarDate) -> TaskServiceResult<Task> {
        let current = self.require(id)?;
        let previous_due = current.due_date;
        let task = schedule::toggle_completion(current, today)?;

        self.repo.update_task(&task)?;
        info!(
            "event=task_toggle module=service status=ok task_id={id} state={} from={} to={}",
            task.status.as_str(),
            format_calendar_date(previous_due),
            format_calendar_date(task.due_date)
        );
        Ok(task)
    }

    pub fn delete_task(&self, id: TaskId) -> TaskServiceResult<()> {
        self.repo.delete_task(id)?;
        info!("event=task_delete module=service status=ok task_id={id}");
        Ok(())
    }

    pub fn get_task(&self, id: TaskId) -> TaskServiceResult<Option<Task>> {
        Ok(self.repo.get_task(id)?)
    }

    pub fn list_tasks(&self, query: &TaskListQuery) -> TaskServiceResult<Vec<Task>> {
        Ok(query.apply(self.repo.load_tasks()?))
    }

    /// Returns the whole collection in stored order.
    pub fn export_tasks(&self) -> TaskServiceResult<Vec<Task>> {
        Ok(self.repo.load_tasks()?)
    }

    /// Replaces the collection with `tasks`, reconciled against `today`.
    pub fn import_tasks(
        &self,
        tasks: Vec<Task>,
        today: CalendarDate,
    ) -> TaskServiceResult<ReconcileSummary> {
        let summary = self.reconcile_and_store(tasks, today, true)?;
        info!(
            "event=tasks_import module=service status=ok total={} advanced={}",
            summary.total, summary.advanced
        );
        Ok(summary)
    }

    fn reconcile_and_store(
        &self,
        tasks: Vec<Task>,
        today: CalendarDate,
        always_store: bool,
    ) -> TaskServiceResult<ReconcileSummary> {
        let summary = ReconcileSummary {
            total: tasks.len(),
            advanced: tasks
                .iter()
                .filter(|task| schedule::is_lapsed(task, today))
                .count(),
        };

        if summary.advanced > 0 || always_store {
            let reconciled = schedule::reconcile(tasks, today).map_err(|err| {
                error!(
                    "event=reconcile module=service status=error today={} error={err}",
                    format_calendar_date(today)
                );
                err
            })?;
            self.repo.save_tasks(&reconciled)?;
        }

        info!(
            "event=reconcile module=service status=ok today={} total={} advanced={}",
            format_calendar_date(today),
            summary.total,
            summary.advanced
        );
        Ok(summary)
    }

    fn require(&self, id: TaskId) -> TaskServiceResult<Task> {
        self.repo
            .get_task(id)?
            .ok_or(TaskServiceError::TaskNotFound(id))
    }

    fn read_back(&self, id: TaskId, details: &'static str) -> TaskServiceResult<Task> {
        self.repo
            .get_task(id)?
            .ok_or(TaskServiceError::InconsistentState(details))
    }
}

fn normalize_title(title: &str) -> TaskServiceResult<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(TaskServiceError::InvalidInput("title is required".to_string()));
    }
    Ok(trimmed.to_string())
}
