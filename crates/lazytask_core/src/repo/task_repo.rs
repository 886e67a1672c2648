//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist the task collection and individual task records.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `Task::validate()` before any SQL mutation.
//! - Read paths reject invalid persisted state instead of masking it.
//! - `load_tasks` returns tasks in stored collection order; `save_tasks`
//!   replaces the whole collection atomically.

use crate::db::DbError;
use crate::model::date::{format_calendar_date, parse_calendar_date};
use crate::model::recurrence::RecurrenceRule;
use crate::model::task::{
    Task, TaskCategory, TaskId, TaskPriority, TaskStatus, TaskValidationError,
};
use rusqlite::{params, Connection, Row, Statement};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const TASK_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    category,
    priority,
    due_date,
    status,
    recurrence_type,
    recurrence_ordinal
FROM tasks";

const TASK_INSERT_SQL: &str = "INSERT INTO tasks (
    id,
    position,
    title,
    description,
    category,
    priority,
    due_date,
    status,
    recurrence_type,
    recurrence_ordinal
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for task persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(TaskValidationError),
    Db(DbError),
    NotFound(TaskId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted task data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<TaskValidationError> for RepoError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence contract consumed by task services.
pub trait TaskRepository {
    /// Loads the whole collection in stored order.
    fn load_tasks(&self) -> RepoResult<Vec<Task>>;
    /// Atomically replaces the whole collection; slice order becomes stored order.
    fn save_tasks(&self, tasks: &[Task]) -> RepoResult<()>;
    /// Appends one task to the end of the collection.
    fn create_task(&self, task: &Task) -> RepoResult<TaskId>;
    fn update_task(&self, task: &Task) -> RepoResult<()>;
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    fn delete_task(&self, id: TaskId) -> RepoResult<()>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn load_tasks(&self) -> RepoResult<Vec<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} ORDER BY position ASC, id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut tasks = Vec::new();

        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }

    fn save_tasks(&self, tasks: &[Task]) -> RepoResult<()> {
        for task in tasks {
            task.validate()?;
        }

        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM tasks;", [])?;
        {
            let mut insert = tx.prepare(TASK_INSERT_SQL)?;
            for (position, task) in tasks.iter().enumerate() {
                let position = i64::try_from(position).map_err(|_| {
                    RepoError::InvalidData(format!("collection position {position} overflows"))
                })?;
                insert_task(&mut insert, task, position)?;
            }
        }
        tx.commit()?;

        Ok(())
    }

    fn create_task(&self, task: &Task) -> RepoResult<TaskId> {
        task.validate()?;

        let position: i64 = self.conn.query_row(
            "SELECT COALESCE(MAX(position) + 1, 0) FROM tasks;",
            [],
            |row| row.get(0),
        )?;
        let mut insert = self.conn.prepare(TASK_INSERT_SQL)?;
        insert_task(&mut insert, task, position)?;

        Ok(task.id)
    }

    fn update_task(&self, task: &Task) -> RepoResult<()> {
        task.validate()?;

        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                title = ?1,
                description = ?2,
                category = ?3,
                priority = ?4,
                due_date = ?5,
                status = ?6,
                recurrence_type = ?7,
                recurrence_ordinal = ?8,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?9;",
            params![
                task.title.as_str(),
                task.description.as_str(),
                task.category.as_str(),
                task.priority.as_str(),
                format_calendar_date(task.due_date),
                task.status.as_str(),
                task.recurrence.kind().as_str(),
                task.recurrence.ordinal().map(|ordinal| ordinal.as_str()),
                task.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(task.id));
        }

        Ok(())
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_task_row(row)?)),
            None => Ok(None),
        }
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn insert_task(insert: &mut Statement<'_>, task: &Task, position: i64) -> RepoResult<()> {
    insert.execute(params![
        task.id.to_string(),
        position,
        task.title.as_str(),
        task.description.as_str(),
        task.category.as_str(),
        task.priority.as_str(),
        format_calendar_date(task.due_date),
        task.status.as_str(),
        task.recurrence.kind().as_str(),
        task.recurrence.ordinal().map(|ordinal| ordinal.as_str()),
    ])?;
    Ok(())
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in tasks.id"))
    })?;

    let category_text: String = row.get("category")?;
    let category = category_text
        .parse::<TaskCategory>()
        .map_err(|err| RepoError::InvalidData(format!("{err} in tasks.category")))?;

    let priority_text: String = row.get("priority")?;
    let priority = priority_text
        .parse::<TaskPriority>()
        .map_err(|err| RepoError::InvalidData(format!("{err} in tasks.priority")))?;

    let status_text: String = row.get("status")?;
    let status = status_text
        .parse::<TaskStatus>()
        .map_err(|err| RepoError::InvalidData(format!("{err} in tasks.status")))?;

    let due_text: String = row.get("due_date")?;
    let due_date = parse_calendar_date(&due_text)
        .map_err(|err| RepoError::InvalidData(format!("{err} in tasks.due_date")))?;

    let recurrence_type: String = row.get("recurrence_type")?;
    let recurrence_ordinal: Option<String> = row.get("recurrence_ordinal")?;
    let recurrence = RecurrenceRule::from_parts(&recurrence_type, recurrence_ordinal.as_deref())
        .map_err(|err| RepoError::InvalidData(format!("{err} in tasks.recurrence_*")))?;

    let task = Task {
        id,
        title: row.get("title")?,
        description: row.get("description")?,
        category,
        priority,
        due_date,
        status,
        recurrence,
    };
    task.validate()?;
    Ok(task)
}
