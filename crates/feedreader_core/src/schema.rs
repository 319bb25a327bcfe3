//! Static catalog for the `entry` table.
//!
//! # Responsibility
//! - Describe the physical shape of the single `entry` table.
//! - Derive the DDL used by create and upgrade migrations.
//!
//! # Invariants
//! - DDL generation is pure; repeated calls return identical text.
//! - `CURRENT_VERSION` only grows. Every bump drops and recreates the table.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Schema revision written to `PRAGMA user_version` after a successful open.
pub const CURRENT_VERSION: u32 = 1;

/// Physical table name.
pub const TABLE_NAME: &str = "entry";

/// File name used when the caller only supplies a directory.
pub const DEFAULT_DB_FILE_NAME: &str = "FeedReader.db";

/// Physical columns of the `entry` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    /// Integer primary key, assigned by SQLite.
    Id,
    Title,
    Subtitle,
}

impl Column {
    pub const ALL: [Column; 3] = [Column::Id, Column::Title, Column::Subtitle];

    /// Column name as stored in SQLite.
    pub fn name(self) -> &'static str {
        match self {
            Self::Id => "_id",
            Self::Title => "title",
            Self::Subtitle => "subtitle",
        }
    }

    fn definition(self) -> &'static str {
        match self {
            Self::Id => "INTEGER PRIMARY KEY AUTOINCREMENT",
            Self::Title | Self::Subtitle => "TEXT",
        }
    }
}

impl Display for Column {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Columns accepted as `ORDER BY` targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderColumn {
    Title,
    Subtitle,
}

impl OrderColumn {
    /// Physical column backing this ordering.
    pub fn column(self) -> Column {
        match self {
            Self::Title => Column::Title,
            Self::Subtitle => Column::Subtitle,
        }
    }
}

/// Rejected order-by target, carrying the raw input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownColumn(pub String);

impl Display for UnknownColumn {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported order column `{}`; expected title|subtitle",
            self.0
        )
    }
}

impl std::error::Error for UnknownColumn {}

impl FromStr for OrderColumn {
    type Err = UnknownColumn;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "title" => Ok(Self::Title),
            "subtitle" => Ok(Self::Subtitle),
            other => Err(UnknownColumn(other.to_string())),
        }
    }
}

/// Returns the DDL that creates the `entry` table.
pub fn create_statement() -> String {
    let columns = Column::ALL
        .iter()
        .map(|column| format!("{} {}", column.name(), column.definition()))
        .collect::<Vec<_>>()
        .join(", ");
    format!("CREATE TABLE {TABLE_NAME} ({columns});")
}

/// Returns the DDL that removes the `entry` table when present.
pub fn drop_statement() -> String {
    format!("DROP TABLE IF EXISTS {TABLE_NAME};")
}

#[cfg(test)]
mod tests {
    use super::{create_statement, drop_statement, OrderColumn, UnknownColumn};

    #[test]
    fn create_statement_is_deterministic() {
        assert_eq!(create_statement(), create_statement());
        assert_eq!(
            create_statement(),
            "CREATE TABLE entry (_id INTEGER PRIMARY KEY AUTOINCREMENT, title TEXT, subtitle TEXT);"
        );
    }

    #[test]
    fn drop_statement_tolerates_missing_table() {
        assert_eq!(drop_statement(), "DROP TABLE IF EXISTS entry;");
    }

    #[test]
    fn order_column_parses_only_text_columns() {
        assert_eq!("title".parse::<OrderColumn>(), Ok(OrderColumn::Title));
        assert_eq!("subtitle".parse::<OrderColumn>(), Ok(OrderColumn::Subtitle));
        assert_eq!(
            "_id".parse::<OrderColumn>(),
            Err(UnknownColumn("_id".to_string()))
        );
        assert!("TITLE".parse::<OrderColumn>().is_err());
    }
}
