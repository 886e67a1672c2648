//! In-memory filtering and ordering for task listings.

use crate::model::task::{Task, TaskCategory, TaskStatus, UnknownValueError};
use std::cmp::Reverse;
use std::str::FromStr;

/// Listing order. All orders are stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskSortOrder {
    #[default]
    DueDateAsc,
    DueDateDesc,
    PriorityDesc,
}

impl TaskSortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DueDateAsc => "due-asc",
            Self::DueDateDesc => "due-desc",
            Self::PriorityDesc => "priority",
        }
    }
}

impl FromStr for TaskSortOrder {
    type Err = UnknownValueError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "due-asc" | "due" => Ok(Self::DueDateAsc),
            "due-desc" => Ok(Self::DueDateDesc),
            "priority" | "priority-desc" => Ok(Self::PriorityDesc),
            _ => Err(UnknownValueError::new("sort order", value)),
        }
    }
}

/// Listing filters plus sort order. The default lists everything by due date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskListQuery {
    pub category: Option<TaskCategory>,
    pub status: Option<TaskStatus>,
    /// Case-insensitive substring over title and description.
    pub search: Option<String>,
    pub sort: TaskSortOrder,
}

impl TaskListQuery {
    pub fn matches(&self, task: &Task) -> bool {
        if self.category.is_some_and(|category| category != task.category) {
            return false;
        }
        if self.status.is_some_and(|status| status != task.status) {
            return false;
        }
        match self.normalized_search() {
            Some(needle) => {
                task.title.to_lowercase().contains(&needle)
                    || task.description.to_lowercase().contains(&needle)
            }
            None => true,
        }
    }

    /// Filters then sorts `tasks`.
    pub fn apply(&self, tasks: Vec<Task>) -> Vec<Task> {
        let mut selected: Vec<Task> = tasks.into_iter().filter(|task| self.matches(task)).collect();
        match self.sort {
            TaskSortOrder::DueDateAsc => selected.sort_by_key(|task| task.due_date),
            TaskSortOrder::DueDateDesc => selected.sort_by_key(|task| Reverse(task.due_date)),
            TaskSortOrder::PriorityDesc => {
                selected.sort_by_key(|task| Reverse(task.priority.rank()))
            }
        }
        selected
    }

    fn normalized_search(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_lowercase)
    }
}

#[cfg(test)]
mod tests {
    use super::{TaskListQuery, TaskSortOrder};
    use crate::model::recurrence::RecurrenceRule;
    use crate::model::task::{Task, TaskCategory, TaskPriority, TaskStatus};
    use chrono::NaiveDate;

    fn task(title: &str, day: u32, priority: TaskPriority, category: TaskCategory) -> Task {
        let mut task = Task::new(
            title,
            NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            RecurrenceRule::OneTime,
        );
        task.priority = priority;
        task.category = category;
        task
    }

    fn titles(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|task| task.title.as_str()).collect()
    }

    fn sample() -> Vec<Task> {
        let mut done = task("Prune roses", 3, TaskPriority::Low, TaskCategory::Gardening);
        done.status = TaskStatus::Completed;
        done.description = "before the frost".to_string();
        vec![
            task("Quarterly report", 20, TaskPriority::High, TaskCategory::Office),
            done,
            task("Fix gutter", 9, TaskPriority::Medium, TaskCategory::House),
            task("Inbox zero", 9, TaskPriority::High, TaskCategory::Office),
        ]
    }

    #[test]
    fn default_sorts_by_due_date_stably() {
        let listed = TaskListQuery::default().apply(sample());
        assert_eq!(
            titles(&listed),
            vec!["Prune roses", "Fix gutter", "Inbox zero", "Quarterly report"]
        );
    }

    #[test]
    fn priority_sort_keeps_insertion_order_for_ties() {
        let query = TaskListQuery {
            sort: TaskSortOrder::PriorityDesc,
            ..TaskListQuery::default()
        };
        let listed = query.apply(sample());
        assert_eq!(
            titles(&listed),
            vec!["Quarterly report", "Inbox zero", "Fix gutter", "Prune roses"]
        );
    }

    #[test]
    fn filters_combine() {
        let query = TaskListQuery {
            category: Some(TaskCategory::Office),
            status: Some(TaskStatus::Pending),
            sort: TaskSortOrder::DueDateDesc,
            ..TaskListQuery::default()
        };
        assert_eq!(
            titles(&query.apply(sample())),
            vec!["Quarterly report", "Inbox zero"]
        );
    }

    #[test]
    fn search_covers_description_case_insensitively() {
        let query = TaskListQuery {
            search: Some("  FROST ".to_string()),
            ..TaskListQuery::default()
        };
        assert_eq!(titles(&query.apply(sample())), vec!["Prune roses"]);
    }

    #[test]
    fn blank_search_matches_everything() {
        let query = TaskListQuery {
            search: Some("   ".to_string()),
            ..TaskListQuery::default()
        };
        assert_eq!(query.apply(sample()).len(), 4);
    }

    #[test]
    fn sort_order_parses_cli_spellings() {
        assert_eq!("due-desc".parse::<TaskSortOrder>().unwrap(), TaskSortOrder::DueDateDesc);
        assert_eq!("Priority".parse::<TaskSortOrder>().unwrap(), TaskSortOrder::PriorityDesc);
        assert!("alphabetical".parse::<TaskSortOrder>().is_err());
    }
}
