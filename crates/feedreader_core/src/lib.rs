//! Persistence core for FeedReader entries.
//!
//! A single `entry` table in an embedded SQLite file, a versioned
//! drop-and-recreate migration, and a small CRUD contract exposed through
//! [`EntryStore`].

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod schema;
pub mod store;

pub use config::StoreConfig;
pub use logging::{init_logging, logging_status, LogLevel};
pub use model::entry::{Entry, EntryId};
pub use repo::entry_repo::{EntryListQuery, EntryRepository, SortDirection, SqliteEntryRepository};
pub use schema::{OrderColumn, CURRENT_VERSION, DEFAULT_DB_FILE_NAME};
pub use store::{EntryCursor, EntryStore, StoreError, StoreLocation, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
