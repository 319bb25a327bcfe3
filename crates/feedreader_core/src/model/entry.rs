//! Entry domain model.
//!
//! # Invariants
//! - `id` is assigned by the store and never reused, even after delete.
//! - `title` and `subtitle` are nullable and carry no uniqueness constraint.

use serde::{Deserialize, Serialize};

/// Store-assigned primary key.
pub type EntryId = i64;

/// Owned projection of one row of the `entry` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub title: Option<String>,
    pub subtitle: Option<String>,
}

impl Entry {
    /// Returns the title, or an empty string when the column is `NULL`.
    pub fn title_or_empty(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    /// Returns the subtitle, or an empty string when the column is `NULL`.
    pub fn subtitle_or_empty(&self) -> &str {
        self.subtitle.as_deref().unwrap_or_default()
    }
}
