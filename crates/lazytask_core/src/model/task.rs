//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record persisted by repositories and moved
//!   through the scheduling engine.
//! - Validate record-level invariants before persistence and after decode.
//!
//! # Invariants
//! - `id` is stable and never nil.
//! - `title` is never blank.
//! - A recurring task is never stored as `Completed`; completing it advances
//!   its due date instead.

use crate::model::date::{self, CalendarDate};
use crate::model::recurrence::RecurrenceRule;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier of a task.
pub type TaskId = Uuid;

/// Life area a task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    #[default]
    Office,
    House,
    Gardening,
    Building,
}

impl TaskCategory {
    pub const ALL: [TaskCategory; 4] = [Self::Office, Self::House, Self::Gardening, Self::Building];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Office => "office",
            Self::House => "house",
            Self::Gardening => "gardening",
            Self::Building => "building",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Office => "Office Work",
            Self::House => "House Maintenance",
            Self::Gardening => "Gardening Maintenance",
            Self::Building => "Building Maintenance",
        }
    }
}

impl FromStr for TaskCategory {
    type Err = UnknownValueError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == normalized)
            .ok_or_else(|| UnknownValueError::new("category", value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Ordering weight; higher is more urgent.
    pub fn rank(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }
}

impl FromStr for TaskPriority {
    type Err = UnknownValueError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(UnknownValueError::new("priority", value)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    Completed,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Pending => Self::Completed,
            Self::Completed => Self::Pending,
        }
    }
}

impl FromStr for TaskStatus {
    type Err = UnknownValueError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            _ => Err(UnknownValueError::new("status", value)),
        }
    }
}

/// Text input that names no variant of a task enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownValueError {
    pub field: &'static str,
    pub value: String,
}

impl UnknownValueError {
    pub fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.trim().to_string(),
        }
    }
}

impl Display for UnknownValueError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown {} `{}`", self.field, self.value)
    }
}

impl Error for UnknownValueError {}

/// Record-level invariant violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    NilId,
    BlankTitle,
    CompletedRecurring(TaskId),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "task id must not be nil"),
            Self::BlankTitle => write!(f, "task title must not be blank"),
            Self::CompletedRecurring(id) => {
                write!(f, "recurring task {id} cannot be stored as completed")
            }
        }
    }
}

impl Error for TaskValidationError {}

/// Canonical task record.
///
/// Only `due_date`, `recurrence` and `status` matter to the scheduling
/// engine; the remaining fields are carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaskRecord")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub category: TaskCategory,
    pub priority: TaskPriority,
    #[serde(with = "date::iso")]
    pub due_date: CalendarDate,
    pub status: TaskStatus,
    pub recurrence: RecurrenceRule,
}

impl Task {
    /// Creates a pending task with a generated id and default metadata.
    pub fn new(title: impl Into<String>, due_date: CalendarDate, recurrence: RecurrenceRule) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: String::new(),
            category: TaskCategory::default(),
            priority: TaskPriority::default(),
            due_date,
            status: TaskStatus::Pending,
            recurrence,
        }
    }

    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.is_nil() {
            return Err(TaskValidationError::NilId);
        }
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::BlankTitle);
        }
        if self.recurrence.is_recurring() && self.status == TaskStatus::Completed {
            return Err(TaskValidationError::CompletedRecurring(self.id));
        }
        Ok(())
    }

    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_recurring()
    }
}

#[derive(Debug, Deserialize)]
struct TaskRecord {
    id: TaskId,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    category: TaskCategory,
    #[serde(default)]
    priority: TaskPriority,
    #[serde(with = "date::iso")]
    due_date: CalendarDate,
    #[serde(default)]
    status: TaskStatus,
    #[serde(default)]
    recurrence: RecurrenceRule,
}

impl TryFrom<TaskRecord> for Task {
    type Error = TaskValidationError;

    fn try_from(value: TaskRecord) -> Result<Self, Self::Error> {
        let task = Self {
            id: value.id,
            title: value.title,
            description: value.description,
            category: value.category,
            priority: value.priority,
            due_date: value.due_date,
            status: value.status,
            recurrence: value.recurrence,
        };
        task.validate()?;
        Ok(task)
    }
}
