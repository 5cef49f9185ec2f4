// src/pipeline/ingest.rs

//! Ingestion orchestrator.
//!
//! Drives one full cycle — fetch, per-item normalization, per-event
//! reconciliation — and aggregates counts. Holds no state between runs;
//! re-running with an overlapping window is safe and creates no duplicates.

use chrono::{Days, NaiveDate, Utc};

use crate::models::{FetchStatus, IngestSummary, RawListingItem, UpstreamConfig};
use crate::pipeline::normalize::normalize;
use crate::pipeline::reconcile::{ReconcileOutcome, reconcile};
use crate::services::{FetchOutcome, ListingsClient};
use crate::storage::SqliteStore;

/// Inclusive calendar-date fetch window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Window from today through today + `days`.
    pub fn days_from_today(days: u32) -> Self {
        let start = Utc::now().date_naive();
        let end = start
            .checked_add_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MAX);
        Self { start, end }
    }
}

/// Run one ingestion cycle over the window.
///
/// Never raises for partial failures; everything the caller needs to react
/// to is in the summary. Only [`FetchStatus::Failed`] — a terminal fetch
/// error before any item was retrieved — warrants more than a log line.
pub async fn run_ingest(
    client: &ListingsClient,
    store: &SqliteStore,
    config: &UpstreamConfig,
    window: DateWindow,
) -> IngestSummary {
    let outcome = client.fetch_window(window.start, window.end).await;
    let mut summary = process_items(store, config, &outcome.items).await;
    summary.fetch = status_for(&outcome);

    match summary.fetch {
        FetchStatus::Failed => log::error!("fetch failed before any listings were retrieved"),
        FetchStatus::Truncated => log::warn!(
            "fetch ended early after {} pages; processed partial results",
            outcome.pages_fetched
        ),
        FetchStatus::Complete => {}
    }

    log::info!(
        "ingestion done: {} processed, {} inserted, {} updated, {} unchanged, {} skipped",
        summary.processed,
        summary.inserted,
        summary.updated,
        summary.unchanged,
        summary.skipped_errors
    );

    summary
}

/// Normalize and reconcile a batch of raw items, continuing past per-item
/// failures of either kind.
pub async fn process_items(
    store: &SqliteStore,
    config: &UpstreamConfig,
    items: &[RawListingItem],
) -> IngestSummary {
    let mut summary = IngestSummary::default();

    for item in items {
        summary.processed += 1;

        let draft = match normalize(item, config) {
            Ok(draft) => draft,
            Err(e) => {
                log::warn!("skipping listing: {e}");
                summary.skipped_errors += 1;
                continue;
            }
        };

        match reconcile(store, &draft).await {
            Ok(ReconcileOutcome::Inserted) => summary.inserted += 1,
            Ok(ReconcileOutcome::Updated) => summary.updated += 1,
            Ok(ReconcileOutcome::Unchanged) => summary.unchanged += 1,
            Err(e) => {
                log::warn!("failed to persist '{}': {e}", draft.event_name);
                summary.skipped_errors += 1;
            }
        }
    }

    summary
}

/// A failed fetch with zero items is distinguishable from an empty window.
fn status_for(outcome: &FetchOutcome) -> FetchStatus {
    match (&outcome.failure, outcome.items.is_empty()) {
        (None, _) => FetchStatus::Complete,
        (Some(_), true) => FetchStatus::Failed,
        (Some(_), false) => FetchStatus::Truncated,
    }
}
