//! Opening the task store.
//!
//! # Invariants
//! - Returned connections wait up to 5s on a locked file.
//! - Returned connections are at `latest_version()`.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const LOCK_WAIT: Duration = Duration::from_secs(5);

/// Opens the task store at `path`, creating the file and its parent
/// directories on first use.
///
/// # Side effects
/// - Emits `db_open` start/ok/error events with elapsed milliseconds.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    traced_open("file", || {
        ensure_parent_dir(path)?;
        Ok(Connection::open(path)?)
    })
}

/// Opens a throwaway in-memory task store.
pub fn open_db_in_memory() -> DbResult<Connection> {
    traced_open("memory", || Ok(Connection::open_in_memory()?))
}

fn traced_open(
    mode: &'static str,
    connect: impl FnOnce() -> DbResult<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let opened = connect().and_then(|mut conn| {
        conn.busy_timeout(LOCK_WAIT)?;
        apply_migrations(&mut conn)?;
        Ok(conn)
    });

    let elapsed_ms = started_at.elapsed().as_millis();
    match &opened {
        Ok(_) => info!("event=db_open module=db status=ok mode={mode} duration_ms={elapsed_ms}"),
        Err(err) => error!(
            "event=db_open module=db status=error mode={mode} duration_ms={elapsed_ms} error={err}"
        ),
    }
    opened
}

fn ensure_parent_dir(path: &Path) -> DbResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|err| DbError::ParentDirectory {
                path: parent.to_path_buf(),
                message: err.to_string(),
            })
        }
        _ => Ok(()),
    }
}
