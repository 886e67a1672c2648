//! Command-line surface of the `lazytask` binary.
//!
//! # Responsibility
//! - Declare global options and subcommands for clap.
//! - Turn parsed arguments into core request types (`NewTask`, `TaskEdit`,
//!   `TaskListQuery`).
//!
//! # Invariants
//! - Global options are accepted before or after the subcommand and fall back
//!   to their `LAZYTASK_*` environment variables.
//! - Enum-valued options parse through the core `FromStr` impls, so the CLI
//!   accepts exactly the spellings the core accepts.

use clap::{Args, Parser, Subcommand};
use lazytask_core::{
    parse_calendar_date, CalendarDate, LogLevel, NewTask, RecurrenceKind, RecurrenceRule,
    SundayOrdinal, TaskCategory, TaskEdit, TaskId, TaskListQuery, TaskPriority, TaskSortOrder,
    TaskStatus,
};
use std::path::PathBuf;

/// LazyTask: personal tasks with Sunday-based recurrence.
#[derive(Parser, Debug)]
#[command(name = "lazytask", version, about, long_about = None)]
pub struct Cli {
    /// Database file [default: <temp dir>/lazytask.sqlite3]
    #[arg(long, global = true, env = "LAZYTASK_DB_PATH", value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, global = true, env = "LAZYTASK_LOG_DIR", value_name = "DIR")]
    pub log_dir: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "LAZYTASK_LOG_LEVEL", value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Override today's date (YYYY-MM-DD)
    #[arg(
        long,
        global = true,
        env = "LAZYTASK_TODAY",
        value_name = "DATE",
        value_parser = parse_calendar_date
    )]
    pub today: Option<CalendarDate>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List tasks, filtered and sorted
    #[command(alias = "ls")]
    List(ListArgs),

    /// Create a task
    Add(AddArgs),

    /// Change fields of an existing task
    Edit(EditArgs),

    /// Complete a one-time task (or reopen it); advance a recurring one
    #[command(alias = "done")]
    Toggle {
        /// Task id
        id: TaskId,
    },

    /// Delete a task permanently
    #[command(alias = "rm")]
    Delete {
        /// Task id
        id: TaskId,
    },

    /// Report the catch-up pass that ran when the database was opened
    Reconcile,

    /// Write all tasks as a JSON array
    Export {
        /// Target file; stdout when omitted
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Replace all tasks with a JSON array read from FILE
    Import {
        /// Source file
        file: PathBuf,
    },

    /// Print CLI and core versions
    Version,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::List(_) => "list",
            Self::Add(_) => "add",
            Self::Edit(_) => "edit",
            Self::Toggle { .. } => "toggle",
            Self::Delete { .. } => "delete",
            Self::Reconcile => "reconcile",
            Self::Export { .. } => "export",
            Self::Import { .. } => "import",
            Self::Version => "version",
        }
    }

    /// Whether the command works on the task database.
    pub fn needs_database(&self) -> bool {
        !matches!(self, Self::Version)
    }
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// office, house, gardening or building
    #[arg(long)]
    pub category: Option<TaskCategory>,

    /// pending or completed
    #[arg(long)]
    pub status: Option<TaskStatus>,

    /// Case-insensitive text matched against title and description
    #[arg(long)]
    pub search: Option<String>,

    /// due-asc (default), due-desc or priority
    #[arg(long)]
    pub sort: Option<TaskSortOrder>,
}

impl ListArgs {
    pub fn into_query(self) -> TaskListQuery {
        TaskListQuery {
            category: self.category,
            status: self.status,
            search: self.search,
            sort: self.sort.unwrap_or_default(),
        }
    }
}

/// `--repeat` / `--ordinal` pair shared by `add` and `edit`.
#[derive(Args, Debug)]
pub struct RuleArgs {
    /// one-time, weekly or monthly
    #[arg(long, value_name = "KIND")]
    pub repeat: Option<RecurrenceKind>,

    /// first, second or third Sunday; implies --repeat monthly
    #[arg(long, value_name = "N")]
    pub ordinal: Option<SundayOrdinal>,
}

impl RuleArgs {
    /// `None` when neither option was given.
    pub fn into_rule(self) -> Result<Option<RecurrenceRule>, String> {
        let kind = match (self.repeat, self.ordinal) {
            (None, None) => return Ok(None),
            (None, Some(_)) => RecurrenceKind::MonthlyNthSunday,
            (Some(kind), _) => kind,
        };
        RecurrenceRule::from_parts(kind.as_str(), self.ordinal.map(SundayOrdinal::as_str))
            .map(Some)
            .map_err(|err| err.to_string())
    }
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Title; several words are joined with single spaces
    #[arg(required = true)]
    pub title: Vec<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub category: Option<TaskCategory>,

    /// low, medium or high
    #[arg(long)]
    pub priority: Option<TaskPriority>,

    /// Due date (YYYY-MM-DD); required for one-time tasks
    #[arg(long, value_parser = parse_calendar_date)]
    pub due: Option<CalendarDate>,

    #[command(flatten)]
    pub rule: RuleArgs,
}

impl AddArgs {
    pub fn into_request(self) -> Result<NewTask, String> {
        let recurrence = self.rule.into_rule()?.unwrap_or_default();
        Ok(NewTask {
            description: self.description.unwrap_or_default(),
            category: self.category.unwrap_or_default(),
            priority: self.priority.unwrap_or_default(),
            due_date: self.due,
            ..NewTask::new(self.title.join(" "), recurrence)
        })
    }
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Task id
    pub id: TaskId,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub category: Option<TaskCategory>,

    #[arg(long)]
    pub priority: Option<TaskPriority>,

    /// New due date (YYYY-MM-DD); recurring tasks move to the next occurrence after it
    #[arg(long, value_parser = parse_calendar_date)]
    pub due: Option<CalendarDate>,

    #[command(flatten)]
    pub rule: RuleArgs,
}

impl EditArgs {
    pub fn into_edit(self) -> Result<(TaskId, TaskEdit), String> {
        let edit = TaskEdit {
            title: self.title,
            description: self.description,
            category: self.category,
            priority: self.priority,
            due_date: self.due,
            recurrence: self.rule.into_rule()?,
        };
        Ok((self.id, edit))
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use chrono::NaiveDate;
    use clap::error::ErrorKind;
    use clap::{CommandFactory, Parser};
    use lazytask_core::{
        RecurrenceRule, SundayOrdinal, TaskCategory, TaskPriority, TaskSortOrder, TaskStatus,
    };
    use uuid::Uuid;

    const ID: &str = "11111111-2222-4333-8444-555555555555";

    fn parse(line: &str) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("lazytask").chain(line.split_whitespace()))
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_options_are_accepted_after_the_subcommand() {
        let cli = parse("--db /tmp/a.sqlite3 list --json --today=2024-03-01").unwrap();
        assert_eq!(cli.db.as_deref(), Some(std::path::Path::new("/tmp/a.sqlite3")));
        assert_eq!(cli.today, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert!(cli.json);
        assert_eq!(cli.command.name(), "list");
    }

    #[test]
    fn list_options_become_a_query() {
        let cli = parse("ls --category house --status completed --sort priority").unwrap();
        let Command::List(args) = cli.command else {
            panic!("expected list command");
        };
        let query = args.into_query();
        assert_eq!(query.category, Some(TaskCategory::House));
        assert_eq!(query.status, Some(TaskStatus::Completed));
        assert_eq!(query.sort, TaskSortOrder::PriorityDesc);
        assert_eq!(query.search, None);
    }

    #[test]
    fn add_joins_title_words_and_builds_rule() {
        let cli = parse("add pay the rent --repeat monthly --ordinal first --priority high")
            .unwrap();
        let Command::Add(args) = cli.command else {
            panic!("expected add command");
        };
        let request = args.into_request().unwrap();
        assert_eq!(request.title, "pay the rent");
        assert_eq!(
            request.recurrence,
            RecurrenceRule::MonthlyNthSunday(SundayOrdinal::First)
        );
        assert_eq!(request.priority, TaskPriority::High);
        assert_eq!(request.due_date, None);
    }

    #[test]
    fn add_defaults_to_one_time_with_due_date() {
        let Command::Add(args) = parse("add dentist --due 2024-06-12").unwrap().command else {
            panic!("expected add command");
        };
        let request = args.into_request().unwrap();
        assert_eq!(request.recurrence, RecurrenceRule::OneTime);
        assert_eq!(request.due_date, NaiveDate::from_ymd_opt(2024, 6, 12));
    }

    #[test]
    fn monthly_rule_without_ordinal_is_rejected() {
        let Command::Add(args) = parse("add rent --repeat monthly").unwrap().command else {
            panic!("expected add command");
        };
        let err = args.into_request().unwrap_err();
        assert!(err.contains("ordinal"), "unexpected error: {err}");
    }

    #[test]
    fn malformed_values_fail_at_parse_time() {
        for line in [
            "add rent --due 12/06/2024",
            "add rent --ordinal fourth",
            "list --category garage",
            "--log-level verbose list",
            "add",
        ] {
            assert!(parse(line).is_err(), "`{line}` should not parse");
        }
    }

    #[test]
    fn edit_leaves_unsubmitted_fields_unset() {
        let Command::Edit(args) = parse(&format!("edit {ID} --title renamed")).unwrap().command
        else {
            panic!("expected edit command");
        };
        let (id, edit) = args.into_edit().unwrap();
        assert_eq!(id, Uuid::parse_str(ID).unwrap());
        assert_eq!(edit.title.as_deref(), Some("renamed"));
        assert!(!edit.touches_schedule());
    }

    #[test]
    fn ordinal_alone_implies_monthly_rule() {
        let Command::Edit(args) = parse(&format!("edit {ID} --ordinal 3")).unwrap().command else {
            panic!("expected edit command");
        };
        let (_, edit) = args.into_edit().unwrap();
        assert_eq!(
            edit.recurrence,
            Some(RecurrenceRule::MonthlyNthSunday(SundayOrdinal::Third))
        );
    }

    #[test]
    fn id_commands_take_a_uuid() {
        let cli = parse(&format!("done {ID}")).unwrap();
        assert!(matches!(cli.command, Command::Toggle { id } if id == Uuid::parse_str(ID).unwrap()));
        assert!(matches!(parse(&format!("rm {ID}")).unwrap().command, Command::Delete { .. }));
        assert!(parse("delete not-an-id").is_err());
        assert!(parse("toggle").is_err());
    }

    #[test]
    fn help_and_unknown_input_are_reported_by_clap() {
        assert_eq!(parse("--help").unwrap_err().kind(), ErrorKind::DisplayHelp);
        assert_eq!(
            parse("frobnicate").unwrap_err().kind(),
            ErrorKind::InvalidSubcommand
        );
        assert_eq!(
            parse("list --colour red").unwrap_err().kind(),
            ErrorKind::UnknownArgument
        );
    }
}
