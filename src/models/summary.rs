// src/models/summary.rs

//! Summary of one ingestion run.

use serde::Serialize;

/// How the paginated fetch ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStatus {
    /// All pages retrieved up to the empty page
    #[default]
    Complete,

    /// A terminal fetch error after at least one item was retrieved;
    /// accumulated items were still processed
    Truncated,

    /// A terminal fetch error before anything was retrieved. Distinct from
    /// "zero events found", which is `Complete` with zero processed.
    Failed,
}

/// Aggregate counts returned by the ingestion orchestrator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    /// Listing items received from the fetch
    pub processed: usize,

    /// Events seen for the first time
    pub inserted: usize,

    /// Existing events where at least one column actually changed
    pub updated: usize,

    /// Existing events re-seen with no change
    pub unchanged: usize,

    /// Items dropped by normalization or a per-item storage failure
    pub skipped_errors: usize,

    pub fetch: FetchStatus,
}

impl IngestSummary {
    /// Whether the run retrieved nothing and saw a terminal fetch error.
    /// Callers may alert on this where a zero-event run is log-only.
    pub fn fetch_failed(&self) -> bool {
        self.fetch == FetchStatus::Failed
    }
}
