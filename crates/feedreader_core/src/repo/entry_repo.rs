//! Entry repository contract and SQLite implementation.

use crate::db::DbResult;
use crate::model::entry::{Entry, EntryId};
use crate::schema::{Column, OrderColumn, TABLE_NAME};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};

/// Sort direction for list queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn from_descending(descending: bool) -> Self {
        if descending {
            Self::Descending
        } else {
            Self::Ascending
        }
    }

    fn keyword(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// Ordering for `list_entries`. Ties are always broken by ascending id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryListQuery {
    pub order_by: OrderColumn,
    pub direction: SortDirection,
}

impl Default for EntryListQuery {
    fn default() -> Self {
        Self {
            order_by: OrderColumn::Title,
            direction: SortDirection::Ascending,
        }
    }
}

/// Repository interface for entry CRUD operations.
pub trait EntryRepository {
    /// Appends one row and returns its new id.
    fn insert_entry(&mut self, title: Option<&str>, subtitle: Option<&str>)
        -> DbResult<EntryId>;
    /// Returns every row in the requested order.
    fn list_entries(&self, query: &EntryListQuery) -> DbResult<Vec<Entry>>;
    /// Sets `title = new_title` where `title` equals `match_title`.
    fn update_title(&mut self, match_title: &str, new_title: &str) -> DbResult<usize>;
    /// Deletes rows whose `title` equals `match_title`.
    fn delete_by_title(&mut self, match_title: &str) -> DbResult<usize>;
    fn get_entry(&self, id: EntryId) -> DbResult<Option<Entry>>;
    fn count_entries(&self) -> DbResult<u64>;
}

/// SQLite-backed entry repository over a borrowed, migrated connection.
pub struct SqliteEntryRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteEntryRepository<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }
}

impl EntryRepository for SqliteEntryRepository<'_> {
    fn insert_entry(
        &mut self,
        title: Option<&str>,
        subtitle: Option<&str>,
    ) -> DbResult<EntryId> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            &format!(
                "INSERT INTO {TABLE_NAME} ({}, {}) VALUES (?1, ?2);",
                Column::Title,
                Column::Subtitle
            ),
            params![title, subtitle],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(id)
    }

    fn list_entries(&self, query: &EntryListQuery) -> DbResult<Vec<Entry>> {
        let sql = format!(
            "{} ORDER BY {} {}, {} ASC;",
            select_sql(),
            query.order_by.column(),
            query.direction.keyword(),
            Column::Id
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let entries = stmt
            .query_map([], parse_entry_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    fn update_title(&mut self, match_title: &str, new_title: &str) -> DbResult<usize> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            &format!(
                "UPDATE {TABLE_NAME} SET {title} = ?1 WHERE {title} = ?2;",
                title = Column::Title
            ),
            params![new_title, match_title],
        )?;
        tx.commit()?;
        Ok(changed)
    }

    fn delete_by_title(&mut self, match_title: &str) -> DbResult<usize> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let deleted = tx.execute(
            &format!("DELETE FROM {TABLE_NAME} WHERE {} = ?1;", Column::Title),
            [match_title],
        )?;
        tx.commit()?;
        Ok(deleted)
    }

    fn get_entry(&self, id: EntryId) -> DbResult<Option<Entry>> {
        let entry = self
            .conn
            .query_row(
                &format!("{} WHERE {} = ?1;", select_sql(), Column::Id),
                [id],
                parse_entry_row,
            )
            .optional()?;
        Ok(entry)
    }

    fn count_entries(&self) -> DbResult<u64> {
        let count = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {TABLE_NAME};"),
            [],
            |row| row.get::<_, i64>(0),
        )?;
        Ok(count.unsigned_abs())
    }
}

fn select_sql() -> String {
    format!(
        "SELECT {}, {}, {} FROM {TABLE_NAME}",
        Column::Id,
        Column::Title,
        Column::Subtitle
    )
}

fn parse_entry_row(row: &Row<'_>) -> rusqlite::Result<Entry> {
    Ok(Entry {
        id: row.get(Column::Id.name())?,
        title: row.get(Column::Title.name())?,
        subtitle: row.get(Column::Subtitle.name())?,
    })
}
