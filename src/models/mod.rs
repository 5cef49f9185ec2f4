// src/models/mod.rs

//! Domain models for the radar application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod event;
mod raw;
mod summary;

// Re-export all public types
pub use config::{Config, DatabaseConfig, IngestConfig, UpstreamConfig};
pub use event::{ARTISTS_TBC, CLUB_TBA, EventDraft, EventRecord};
pub use raw::{
    EventListings, ListingData, ListingResponse, RawArtist, RawEvent, RawImage, RawListingItem,
    RawVenue, UpstreamError,
};
pub use summary::{FetchStatus, IngestSummary};
