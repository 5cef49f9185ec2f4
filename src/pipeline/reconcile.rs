// src/pipeline/reconcile.rs

//! Reconciliation of normalized drafts against persisted state.
//!
//! Look-then-write keyed on `source_link`, assuming single-writer access
//! for the duration of one ingestion cycle; the UNIQUE constraint on
//! `source_link` is the backstop against duplicate rows.

use crate::error::Result;
use crate::models::EventDraft;
use crate::storage::SqliteStore;

/// Per-event result of reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// First sighting of this `source_link`; a new row was inserted
    Inserted,

    /// Known event where at least one mutable column changed
    Updated,

    /// Known event, nothing to write
    Unchanged,
}

/// Apply the minimal necessary write for one draft.
///
/// Updates overwrite every mutable field but never touch `notified` or
/// `date_added`, so earlier notification state survives upstream changes.
pub async fn reconcile(store: &SqliteStore, draft: &EventDraft) -> Result<ReconcileOutcome> {
    match store.find_by_source_link(&draft.source_link).await? {
        None => {
            store.insert(draft).await?;
            Ok(ReconcileOutcome::Inserted)
        }
        Some(existing) if existing.differs_from(draft) => {
            store.update(draft).await?;
            Ok(ReconcileOutcome::Updated)
        }
        Some(_) => Ok(ReconcileOutcome::Unchanged),
    }
}
