//! Task store bootstrap: connection setup and schema versioning.
//!
//! # Responsibility
//! - Hand out SQLite connections that already carry the current task schema.
//!
//! # Invariants
//! - The schema version lives in `PRAGMA user_version`.
//! - A store written by a newer build is refused, never downgraded.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod migrations;
mod open;

pub use migrations::{latest_version, schema_version};
pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The directory that should hold the database file could not be created.
    ParentDirectory { path: PathBuf, message: String },
    SchemaTooNew { found: u32, supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::ParentDirectory { path, message } => write!(
                f,
                "cannot create database directory `{}`: {message}",
                path.display()
            ),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "task store uses schema v{found} but this build only understands up to v{supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        if let Self::Sqlite(err) = self {
            Some(err)
        } else {
            None
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
