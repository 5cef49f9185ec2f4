// src/storage/mod.rs

//! Event persistence backed by SQLite.
//!
//! The store owns the schema (created at connect time) and every SQL
//! statement in the crate. Writes that arrive from reconciliation never
//! touch `notified` or `date_added`; the notifier-facing
//! [`SqliteStore::mark_notified`] is the only way `notified` changes, and
//! only false → true.

mod sqlite;

pub use sqlite::{SearchField, SqliteStore};

use crate::models::EventRecord;

/// A page of query results plus the total match count, for pagination UIs.
#[derive(Debug, Clone)]
pub struct EventPage {
    pub events: Vec<EventRecord>,
    pub total: i64,
}
