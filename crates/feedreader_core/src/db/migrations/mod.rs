//! Destructive schema migration for the `entry` table.
//!
//! # Responsibility
//! - Compare `PRAGMA user_version` with the requested schema version.
//! - Create the table on a fresh file, or drop and recreate it on upgrade.
//!
//! # Invariants
//! - All DDL and the marker write run in one transaction.
//! - A file whose marker is newer than the target is never modified.
//! - Upgrades discard existing rows.

use crate::db::{DbError, DbResult};
use crate::schema;
use rusqlite::{Connection, Transaction};

/// What `apply_migrations` did to the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// Marker already matched the target.
    UpToDate,
    /// Fresh file; the table was created.
    Created { version: u32 },
    /// Older marker (or an unversioned table); the table was dropped and recreated.
    Recreated { from: u32, to: u32 },
}

/// Returns the latest schema version known by this binary.
pub fn latest_version() -> u32 {
    schema::CURRENT_VERSION
}

/// Brings the connection's schema to `target_version`.
pub fn apply_migrations(conn: &mut Connection, target_version: u32) -> DbResult<MigrationOutcome> {
    if target_version == 0 {
        return Err(DbError::InvalidTargetVersion(target_version));
    }

    let current_version = current_user_version(conn)?;
    if current_version > target_version {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: target_version,
        });
    }

    if current_version == target_version {
        return Ok(MigrationOutcome::UpToDate);
    }

    let tx = conn.transaction()?;
    let outcome = if current_version == 0 && !table_exists(&tx)? {
        tx.execute_batch(&schema::create_statement())?;
        MigrationOutcome::Created {
            version: target_version,
        }
    } else {
        // Every revision shares the same drop-and-create step, so skipped
        // revisions collapse into a single run.
        tx.execute_batch(&schema::drop_statement())?;
        tx.execute_batch(&schema::create_statement())?;
        MigrationOutcome::Recreated {
            from: current_version,
            to: target_version,
        }
    };
    tx.execute_batch(&format!("PRAGMA user_version = {target_version};"))?;
    tx.commit()?;

    Ok(outcome)
}

/// Reads the persisted schema version marker. A fresh file reports `0`.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

fn table_exists(tx: &Transaction<'_>) -> DbResult<bool> {
    let exists: bool = tx.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
        );",
        [schema::TABLE_NAME],
        |row| row.get(0),
    )?;
    Ok(exists)
}
