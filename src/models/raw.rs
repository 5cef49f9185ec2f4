// src/models/raw.rs

//! Wire format of the upstream listings API.
//!
//! Every field is optional: upstream payloads are partially populated often
//! enough that missing data must route into the per-item error path instead
//! of failing deserialization of a whole page.

use serde::Deserialize;

/// Response body of one paged listings query.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingResponse {
    #[serde(default)]
    pub data: Option<ListingData>,

    /// Error payload; non-empty means the run must stop (HTTP 200 included)
    #[serde(default)]
    pub errors: Option<Vec<UpstreamError>>,
}

/// An error entry reported by the upstream API.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamError {
    #[serde(default)]
    pub message: String,
}

/// `data` envelope of the listings query.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingData {
    #[serde(rename = "eventListings", default)]
    pub event_listings: Option<EventListings>,
}

/// The paged listings container; an empty `data` array signals end-of-data.
#[derive(Debug, Clone, Deserialize)]
pub struct EventListings {
    #[serde(default)]
    pub data: Vec<RawListingItem>,
}

/// One as-received listing item. Transient; never persisted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawListingItem {
    #[serde(default)]
    pub event: Option<RawEvent>,
}

/// The event payload inside a listing item.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawEvent {
    pub title: Option<String>,

    /// ISO-8601 start timestamp; its date portion becomes the event date
    pub date: Option<String>,

    #[serde(rename = "startTime")]
    pub start_time: Option<String>,

    #[serde(rename = "endTime")]
    pub end_time: Option<String>,

    pub venue: Option<RawVenue>,

    pub artists: Vec<RawArtist>,

    pub images: Vec<RawImage>,

    /// Relative content path, appended to the site base URL
    #[serde(rename = "contentUrl")]
    pub content_url: Option<String>,

    pub attending: Option<i64>,
}

impl RawEvent {
    /// Best-effort title for log messages about malformed items.
    pub fn best_title(&self) -> &str {
        self.title.as_deref().unwrap_or("(untitled)")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawVenue {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawArtist {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawImage {
    pub filename: Option<String>,
}
