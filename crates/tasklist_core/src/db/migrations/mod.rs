//! Schema revision registry and executor.
//!
//! # Invariants
//! - `version` values are strictly increasing.
//! - Every applied revision is mirrored to `PRAGMA user_version` inside the
//!   same transaction, so a failed upgrade leaves the old revision intact.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        sql: include_str!("0001_todos.sql"),
    },
    Migration {
        version: 2,
        sql: include_str!("0002_lists.sql"),
    },
];

/// Revision that introduced the `lists` table and `todos.list_id`.
pub const LIST_AWARE_VERSION: u32 = 2;

/// Returns the latest schema revision known by this build.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Reads the revision currently recorded in the database.
pub fn current_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

/// Applies all pending migrations.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    apply_migrations_up_to(conn, latest_version())
}

/// Applies pending migrations up to and including `target`.
///
/// A database already at or past `target` (but not past the latest known
/// revision) is left untouched.
///
/// # Errors
/// - `UnknownTargetVersion` when `target` is not a registered revision.
/// - `UnsupportedSchemaVersion` when the database is newer than this build.
pub fn apply_migrations_up_to(conn: &mut Connection, target: u32) -> DbResult<()> {
    if !MIGRATIONS.iter().any(|migration| migration.version == target) {
        return Err(DbError::UnknownTargetVersion(target));
    }

    let current = current_version(conn)?;
    let latest = latest_version();
    if current > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current,
            latest_supported: latest,
        });
    }
    if current >= target {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS
        .iter()
        .filter(|migration| migration.version > current && migration.version <= target)
    {
        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from_version={current} to_version={target}");
    Ok(())
}
