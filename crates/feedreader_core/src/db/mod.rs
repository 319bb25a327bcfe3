//! SQLite storage bootstrap and schema migration entry points.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the entry store.
//! - Bring the on-disk schema to the requested version before use.
//!
//! # Invariants
//! - The schema version marker is `PRAGMA user_version`.
//! - No entry data is read or written before migrations succeed.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    /// The database file could not be opened, created, read or configured.
    Unavailable(rusqlite::Error),
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    InvalidTargetVersion(u32),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(err) => write!(f, "database unavailable: {err}"),
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::InvalidTargetVersion(version) => {
                write!(f, "schema target version must be positive, got {version}")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Unavailable(err) | Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } | Self::InvalidTargetVersion(_) => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
