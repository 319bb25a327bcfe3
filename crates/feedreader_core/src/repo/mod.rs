//! Repository layer over the `entry` table.
//!
//! # Responsibility
//! - Define the data access contract used by the entry store.
//! - Keep SQL text inside the persistence boundary.
//!
//! # Invariants
//! - Title matching is exact; SQL pattern characters are never interpreted.
//! - Every write runs in its own immediate transaction.

pub mod entry_repo;
