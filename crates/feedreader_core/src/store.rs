//! Entry store: connection lifecycle and the CRUD contract.
//!
//! # Responsibility
//! - Own the single SQLite handle for one storage location.
//! - Run schema migration on open and release the handle on close.
//! - Expose insert/query/update/delete to the presentation layer.
//!
//! # Invariants
//! - Lifecycle is `Closed -> Opening -> Open -> Closed`.
//! - CRUD calls outside `Open` fail with `StoreError::NotOpen`.
//! - All access to the handle is serialized by one mutex, so readers never
//!   observe a partially applied write.
//! - A failed open always leaves the store `Closed` with no file handle held.

use crate::config::StoreConfig;
use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::entry::{Entry, EntryId};
use crate::repo::entry_repo::{
    EntryListQuery, EntryRepository, SortDirection, SqliteEntryRepository,
};
use crate::schema::{OrderColumn, DEFAULT_DB_FILE_NAME};
use log::{error, info, warn};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by `EntryStore`.
#[derive(Debug)]
pub enum StoreError {
    /// The storage file could not be opened or created.
    StorageUnavailable(DbError),
    /// DDL or version marker handling failed while opening.
    SchemaMigrationFailed(DbError),
    /// The operation requires an open store.
    NotOpen,
    /// `open` was called on a store that is opening or open.
    AlreadyOpen,
    /// The requested order-by column is not part of the contract.
    InvalidColumn(String),
    /// SQLite failed while executing a CRUD call or closing.
    StorageIo(DbError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StorageUnavailable(err) => write!(f, "storage unavailable: {err}"),
            Self::SchemaMigrationFailed(err) => write!(f, "schema migration failed: {err}"),
            Self::NotOpen => write!(f, "entry store is not open"),
            Self::AlreadyOpen => write!(f, "entry store is already open"),
            Self::InvalidColumn(column) => {
                write!(f, "invalid order column `{column}`; expected title|subtitle")
            }
            Self::StorageIo(err) => write!(f, "storage I/O error: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StorageUnavailable(err)
            | Self::SchemaMigrationFailed(err)
            | Self::StorageIo(err) => Some(err),
            Self::NotOpen | Self::AlreadyOpen | Self::InvalidColumn(_) => None,
        }
    }
}

impl StoreError {
    fn from_open(err: DbError) -> Self {
        match err {
            DbError::Unavailable(_) => Self::StorageUnavailable(err),
            other => Self::SchemaMigrationFailed(other),
        }
    }
}

/// Where an open store keeps its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    File(PathBuf),
    Memory,
}

enum StoreState {
    Closed,
    /// `close_requested` records a `close` that arrived mid-open.
    Opening { close_requested: bool },
    Open {
        conn: Connection,
        location: StoreLocation,
    },
}

/// Finite snapshot of entries returned by `EntryStore::query_all`.
///
/// Rows are captured when the query runs; later writes are not reflected.
/// Issue a new query to observe them.
#[derive(Debug)]
pub struct EntryCursor {
    rows: std::vec::IntoIter<Entry>,
}

impl Iterator for EntryCursor {
    type Item = Entry;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl ExactSizeIterator for EntryCursor {}

/// Owner of one SQLite handle and the entry CRUD contract.
///
/// `EntryStore` is `Send + Sync`; share it by reference (or `Arc`) between
/// worker threads. Dropping an open store releases its handle.
pub struct EntryStore {
    config: StoreConfig,
    state: Mutex<StoreState>,
}

impl Default for EntryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryStore {
    /// Creates a closed store with default configuration.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Creates a closed store with the given configuration.
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            config,
            state: Mutex::new(StoreState::Closed),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Opens (creating if needed) the database file at `path`.
    ///
    /// # Errors
    /// - `AlreadyOpen` when the store is opening or open.
    /// - `StorageUnavailable` when the file cannot be opened or created.
    /// - `SchemaMigrationFailed` when migration fails; the file is unchanged.
    pub fn open(&self, path: impl AsRef<Path>) -> StoreResult<()> {
        let path = path.as_ref().to_path_buf();
        self.open_with(StoreLocation::File(path.clone()), || {
            open_db(&path, &self.config)
        })
    }

    /// Opens `FeedReader.db` inside `dir`.
    pub fn open_in_dir(&self, dir: impl AsRef<Path>) -> StoreResult<()> {
        self.open(dir.as_ref().join(DEFAULT_DB_FILE_NAME))
    }

    /// Opens a private in-memory database. Its rows vanish on close.
    pub fn open_in_memory(&self) -> StoreResult<()> {
        self.open_with(StoreLocation::Memory, || open_db_in_memory(&self.config))
    }

    fn open_with(
        &self,
        location: StoreLocation,
        connect: impl FnOnce() -> Result<Connection, DbError>,
    ) -> StoreResult<()> {
        {
            let mut state = self.lock();
            if !matches!(*state, StoreState::Closed) {
                warn!("event=store_open module=store status=rejected reason=already_open");
                return Err(StoreError::AlreadyOpen);
            }
            *state = StoreState::Opening {
                close_requested: false,
            };
        }

        // The lock is released while SQLite opens and migrates; concurrent
        // callers see `Opening` and fail fast instead of blocking.
        let result = connect();

        let mut state = self.lock();
        let close_requested = matches!(
            *state,
            StoreState::Opening {
                close_requested: true
            }
        );
        match result {
            Ok(conn) if close_requested => {
                *state = StoreState::Closed;
                drop(state);
                drop(conn);
                warn!("event=store_open module=store status=rejected reason=closed_while_opening");
                Err(StoreError::NotOpen)
            }
            Ok(conn) => {
                *state = StoreState::Open { conn, location };
                info!("event=store_open module=store status=ok");
                Ok(())
            }
            Err(err) => {
                *state = StoreState::Closed;
                let err = StoreError::from_open(err);
                error!("event=store_open module=store status=error error={err}");
                Err(err)
            }
        }
    }

    /// Releases the database handle. Closing a closed store is a no-op.
    ///
    /// The store is `Closed` afterwards even when SQLite reports an error.
    /// A close that lands while another thread is opening makes that open
    /// discard its connection and fail with `NotOpen`.
    pub fn close(&self) -> StoreResult<()> {
        let conn = {
            let mut state = self.lock();
            match std::mem::replace(&mut *state, StoreState::Closed) {
                StoreState::Open { conn, .. } => conn,
                StoreState::Opening { .. } => {
                    *state = StoreState::Opening {
                        close_requested: true,
                    };
                    info!("event=store_close module=store status=deferred");
                    return Ok(());
                }
                other => {
                    *state = other;
                    return Ok(());
                }
            }
        };

        match conn.close() {
            Ok(()) => {
                info!("event=store_close module=store status=ok");
                Ok(())
            }
            Err((_conn, err)) => {
                error!("event=store_close module=store status=error error={err}");
                Err(StoreError::StorageIo(DbError::Sqlite(err)))
            }
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(*self.lock(), StoreState::Open { .. })
    }

    /// Returns the location of the open database, or `None` when not open.
    pub fn location(&self) -> Option<StoreLocation> {
        match &*self.lock() {
            StoreState::Open { location, .. } => Some(location.clone()),
            StoreState::Closed | StoreState::Opening { .. } => None,
        }
    }

    /// Appends one entry and returns its store-assigned id.
    pub fn insert(&self, title: Option<&str>, subtitle: Option<&str>) -> StoreResult<EntryId> {
        let id = self.with_repo("entry_insert", |repo| repo.insert_entry(title, subtitle))?;
        info!("event=entry_insert module=store status=ok id={id}");
        Ok(id)
    }

    /// Returns every entry ordered by `order_by` (`title` or `subtitle`).
    ///
    /// Ties are broken by ascending id.
    pub fn query_all(&self, order_by: &str, descending: bool) -> StoreResult<EntryCursor> {
        let order_by = order_by
            .parse::<OrderColumn>()
            .map_err(|err| StoreError::InvalidColumn(err.0))?;
        self.query(&EntryListQuery {
            order_by,
            direction: SortDirection::from_descending(descending),
        })
    }

    /// Typed variant of [`EntryStore::query_all`].
    pub fn query(&self, query: &EntryListQuery) -> StoreResult<EntryCursor> {
        let rows = self.with_repo("entry_query", |repo| repo.list_entries(query))?;
        info!("event=entry_query module=store status=ok rows={}", rows.len());
        Ok(EntryCursor {
            rows: rows.into_iter(),
        })
    }

    /// Renames every entry whose title equals `match_title` exactly.
    ///
    /// Returns the number of rows changed; zero matches is not an error.
    pub fn update_title(&self, match_title: &str, new_title: &str) -> StoreResult<usize> {
        let count = self.with_repo("entry_update", |repo| {
            repo.update_title(match_title, new_title)
        })?;
        info!("event=entry_update module=store status=ok rows={count}");
        Ok(count)
    }

    /// Deletes every entry whose title equals `match_title` exactly.
    ///
    /// `%` and `_` in `match_title` are literal characters, not wildcards.
    pub fn delete_by_title(&self, match_title: &str) -> StoreResult<usize> {
        let count = self.with_repo("entry_delete", |repo| repo.delete_by_title(match_title))?;
        info!("event=entry_delete module=store status=ok rows={count}");
        Ok(count)
    }

    pub fn get(&self, id: EntryId) -> StoreResult<Option<Entry>> {
        self.with_repo("entry_get", |repo| repo.get_entry(id))
    }

    pub fn count(&self) -> StoreResult<u64> {
        self.with_repo("entry_count", |repo| repo.count_entries())
    }

    fn with_repo<T>(
        &self,
        event: &str,
        op: impl FnOnce(&mut SqliteEntryRepository<'_>) -> Result<T, DbError>,
    ) -> StoreResult<T> {
        let mut state = self.lock();
        let StoreState::Open { conn, .. } = &mut *state else {
            warn!("event={event} module=store status=rejected reason=not_open");
            return Err(StoreError::NotOpen);
        };

        let mut repo = SqliteEntryRepository::new(conn);
        op(&mut repo).map_err(|err| {
            error!("event={event} module=store status=error error={err}");
            StoreError::StorageIo(err)
        })
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        // Writes are transactional, so a panic mid-call cannot leave the
        // connection in a half-applied state.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
