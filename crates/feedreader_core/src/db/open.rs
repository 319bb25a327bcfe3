//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Apply connection pragmas and run schema migrations before handing the
//!   connection out.
//!
//! # Invariants
//! - Returned connections are fully migrated to `config.schema_version`.
//! - A connection that fails bootstrap is dropped, releasing the file.

use super::migrations::{apply_migrations, MigrationOutcome};
use super::{DbError, DbResult};
use crate::config::StoreConfig;
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::Instant;

/// Opens (creating if needed) a SQLite file and migrates it.
///
/// # Errors
/// - `DbError::Unavailable` when the file cannot be opened, read as a
///   database, or configured.
/// - Any other `DbError` when migration fails.
pub fn open_db(path: impl AsRef<Path>, config: &StoreConfig) -> DbResult<Connection> {
    open_with("file", config, || Connection::open(path.as_ref()))
}

/// Opens a private in-memory database and migrates it.
pub fn open_db_in_memory(config: &StoreConfig) -> DbResult<Connection> {
    open_with("memory", config, Connection::open_in_memory)
}

fn open_with(
    mode: &str,
    config: &StoreConfig,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let result = connect()
        .and_then(|conn| {
            conn.busy_timeout(config.busy_timeout)?;
            // Forces the first page read, so a junk or unreadable file fails
            // here rather than inside migration.
            conn.query_row("PRAGMA schema_version;", [], |_| Ok(()))?;
            Ok(conn)
        })
        .map_err(DbError::Unavailable)
        .and_then(|mut conn| {
            let outcome = apply_migrations(&mut conn, config.schema_version)?;
            log_migration(mode, outcome);
            Ok(conn)
        });

    match &result {
        Ok(_) => info!(
            "event=db_open module=db status=ok mode={mode} duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error_code={} error={}",
            started_at.elapsed().as_millis(),
            error_code(err),
            err
        ),
    }
    result
}

fn log_migration(mode: &str, outcome: MigrationOutcome) {
    match outcome {
        MigrationOutcome::UpToDate => {}
        MigrationOutcome::Created { version } => info!(
            "event=db_migrate module=db status=ok mode={mode} action=create version={version}"
        ),
        MigrationOutcome::Recreated { from, to } => info!(
            "event=db_migrate module=db status=ok mode={mode} action=recreate from={from} to={to}"
        ),
    }
}

fn error_code(err: &DbError) -> &'static str {
    match err {
        DbError::Unavailable(_) => "db_open_failed",
        _ => "db_migrate_failed",
    }
}
