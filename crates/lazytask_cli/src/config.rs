//! Runtime configuration for the `lazytask` binary.
//!
//! # Responsibility
//! - Fill the defaults for settings left unset on the command line and in
//!   the `LAZYTASK_*` environment (clap applies both before this runs).
//!
//! # Invariants
//! - Resolution never touches the database or the logger.

use crate::args::Cli;
use lazytask_core::{local_today, CalendarDate, LogLevel};
use std::path::PathBuf;

const DEFAULT_DB_FILE_NAME: &str = "lazytask.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub db_path: PathBuf,
    /// `None` leaves logging disabled.
    pub log_dir: Option<String>,
    pub log_level: LogLevel,
    /// Captured once per invocation and threaded through every action.
    pub today: CalendarDate,
    pub json: bool,
}

impl CliConfig {
    pub fn resolve(cli: &Cli) -> Self {
        Self {
            db_path: cli
                .db
                .clone()
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
            log_dir: cli.log_dir.clone().filter(|dir| !dir.trim().is_empty()),
            log_level: cli.log_level.unwrap_or_else(LogLevel::build_default),
            today: cli.today.unwrap_or_else(local_today),
            json: cli.json,
        }
    }
}
