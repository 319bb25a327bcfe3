//! Store configuration.

use crate::schema;
use std::time::Duration;

/// Tunables applied when a store opens its connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// How long SQLite waits on a locked file before failing a statement.
    pub busy_timeout: Duration,
    /// Schema version the file is migrated to on open.
    ///
    /// Defaults to [`schema::CURRENT_VERSION`]. Raising it forces the
    /// destructive upgrade on the next open.
    pub schema_version: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            busy_timeout: Duration::from_secs(5),
            schema_version: schema::CURRENT_VERSION,
        }
    }
}
