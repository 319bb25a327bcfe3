//! Domain model for persisted entries.
//!
//! # Invariants
//! - Every entry is identified by a store-assigned `EntryId`.
//! - Callers only ever hold owned copies of stored rows.

pub mod entry;
