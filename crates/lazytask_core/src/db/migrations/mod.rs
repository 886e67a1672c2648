//! Ordered schema steps for the task store.
//!
//! # Invariants
//! - Step versions start at 1 and increase by exactly one.
//! - Pending steps run inside a single transaction, each one bumping
//!   `PRAGMA user_version` as it lands.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// `(version, sql)` pairs, oldest first.
const STEPS: [(u32, &str); 1] = [(1, include_str!("0001_init.sql"))];

/// Newest schema version this build can write.
pub fn latest_version() -> u32 {
    STEPS.last().map_or(0, |(version, _)| *version)
}

/// Reads the schema version stamped on `conn`.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get::<_, u32>(0))?)
}

/// Brings `conn` up to `latest_version()`.
///
/// # Errors
/// - `SchemaTooNew` when the store was written by a newer build.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let found = schema_version(conn)?;
    let supported = latest_version();
    if found > supported {
        return Err(DbError::SchemaTooNew { found, supported });
    }

    let pending: Vec<_> = STEPS.iter().filter(|(version, _)| *version > found).collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (version, sql) in pending {
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", version)?;
        info!("event=db_migrate module=db status=ok version={version}");
    }
    tx.commit()?;
    Ok(())
}
