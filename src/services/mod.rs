// src/services/mod.rs

//! Service layer for the radar application.
//!
//! Currently a single service: the upstream listings client
//! (`ListingsClient`), which performs the paginated window fetch.

mod listings;

pub use listings::{FetchOutcome, ListingsClient};
