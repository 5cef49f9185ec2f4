// src/models/event.rs

//! Canonical event records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel artists line for events with no confirmed lineup.
pub const ARTISTS_TBC: &str = "artists to be confirmed";

/// Sentinel club name for events with no announced venue.
pub const CLUB_TBA: &str = "TBA";

/// A normalized event, ready for reconciliation.
///
/// Carries exactly the mutable fields of a persisted event; identity
/// (`source_link`) is included, bookkeeping (`notified`, `date_added`) is not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    pub event_name: String,

    /// Venue name, or [`CLUB_TBA`] when upstream omits the venue
    pub club_name: String,

    /// Calendar date of the event, used for range queries and ordering
    pub event_date: NaiveDate,

    /// Local clock time, `HH:MM`
    pub start_time: String,

    /// Local clock time, `HH:MM`
    pub end_time: String,

    /// Comma-joined artist names, never empty (see [`ARTISTS_TBC`])
    pub artists: String,

    pub attending_count: i64,

    pub buy_link: String,

    /// Stable upstream identity; one row per distinct value
    pub source_link: String,

    /// Flyer URL, empty string when upstream has no image asset
    pub flyer_image: String,
}

/// A persisted event row.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_name: String,
    pub club_name: String,
    pub event_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub artists: String,
    pub attending_count: i64,
    pub buy_link: String,
    pub source_link: String,
    pub flyer_image: String,

    /// Flipped true exactly once by the notifier after dispatch
    pub notified: bool,

    /// Set on insert, never mutated
    pub date_added: DateTime<Utc>,
}

impl EventRecord {
    /// Whether a draft would change at least one mutable column of this row.
    pub fn differs_from(&self, draft: &EventDraft) -> bool {
        self.event_name != draft.event_name
            || self.club_name != draft.club_name
            || self.event_date != draft.event_date
            || self.start_time != draft.start_time
            || self.end_time != draft.end_time
            || self.artists != draft.artists
            || self.attending_count != draft.attending_count
            || self.buy_link != draft.buy_link
            || self.flyer_image != draft.flyer_image
    }
}
