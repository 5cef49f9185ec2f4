// src/services/listings.rs

//! Upstream listings client.
//!
//! Fetches event listings for a date window by walking numbered pages of the
//! GraphQL endpoint until an empty page. A fatal condition (transport error,
//! non-success status, or an upstream error payload) ends pagination for the
//! run; whatever was accumulated is still returned, since partial results
//! remain useful.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use serde_json::json;

use crate::error::{AppError, Result};
use crate::models::{ListingResponse, RawListingItem, UpstreamConfig};
use crate::utils::http;

/// Fields requested per listing item; must stay in sync with `RawEvent`.
const LISTINGS_QUERY: &str = "\
query EVENT_LISTINGS($filters: FilterInputDtoInput, $pageSize: Int, $page: Int) {
  eventListings(filters: $filters, pageSize: $pageSize, page: $page) {
    data {
      event {
        title
        date
        startTime
        endTime
        contentUrl
        attending
        venue { name }
        artists { name }
        images { filename }
      }
    }
  }
}";

/// Product of one window fetch: a finite, non-restartable item sequence.
#[derive(Debug, Default)]
pub struct FetchOutcome {
    /// Items accumulated across pages, in page order
    pub items: Vec<RawListingItem>,

    /// Number of non-empty pages retrieved
    pub pages_fetched: usize,

    /// Terminal error that stopped pagination early, if any
    pub failure: Option<String>,
}

impl FetchOutcome {
    /// Whether pagination stopped before the natural empty page.
    pub fn is_partial(&self) -> bool {
        self.failure.is_some()
    }
}

/// Client for the paged upstream listings query.
pub struct ListingsClient {
    config: Arc<UpstreamConfig>,
    client: reqwest::Client,
}

impl ListingsClient {
    /// Create a new listings client with the given configuration.
    pub fn new(config: Arc<UpstreamConfig>) -> Result<Self> {
        let client = http::create_client(&config)?;
        Ok(Self { config, client })
    }

    /// Fetch all listings published in the inclusive date window.
    ///
    /// Never raises: fatal conditions fold into `FetchOutcome::failure` and
    /// already-fetched items are kept. Pagination is strictly sequential with
    /// a mandatory pacing delay between page requests.
    pub async fn fetch_window(&self, start: NaiveDate, end: NaiveDate) -> FetchOutcome {
        let delay = Duration::from_millis(self.config.page_delay_ms);
        let mut outcome = FetchOutcome::default();
        let mut page: u32 = 1;

        log::info!("fetching listings from {start} to {end}");

        loop {
            match self.fetch_page(start, end, page).await {
                Ok(batch) if batch.is_empty() => {
                    log::debug!("page {page} empty, pagination done");
                    break;
                }
                Ok(batch) => {
                    log::info!("page {page} returned {} listings", batch.len());
                    outcome.pages_fetched += 1;
                    outcome.items.extend(batch);
                    page += 1;
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    log::warn!("fetch stopped on page {page}: {e}");
                    outcome.failure = Some(e.to_string());
                    break;
                }
            }
        }

        outcome
    }

    /// Fetch and parse a single page.
    async fn fetch_page(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        page: u32,
    ) -> Result<Vec<RawListingItem>> {
        let payload = self.page_payload(start, end, page);
        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        parse_page(&body)
    }

    /// Build the GraphQL request body for one page.
    fn page_payload(&self, start: NaiveDate, end: NaiveDate, page: u32) -> serde_json::Value {
        json!({
            "query": LISTINGS_QUERY,
            "variables": {
                "filters": {
                    "areas": { "eq": self.config.area_id },
                    "listingDate": {
                        "gte": start.to_string(),
                        "lte": end.to_string(),
                    },
                },
                "pageSize": self.config.page_size,
                "page": page,
            },
        })
    }
}

/// Parse one page body, treating an upstream error payload as fatal.
fn parse_page(body: &str) -> Result<Vec<RawListingItem>> {
    let response: ListingResponse = serde_json::from_str(body)?;

    if let Some(errors) = response.errors {
        if !errors.is_empty() {
            let joined = errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(AppError::upstream(joined));
        }
    }

    Ok(response
        .data
        .and_then(|d| d.event_listings)
        .map(|l| l.data)
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ListingsClient {
        ListingsClient::new(Arc::new(UpstreamConfig::default())).unwrap()
    }

    #[test]
    fn payload_carries_window_and_page() {
        let start = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        let payload = client().page_payload(start, end, 3);

        let filters = &payload["variables"]["filters"];
        assert_eq!(filters["areas"]["eq"], 20);
        assert_eq!(filters["listingDate"]["gte"], "2025-09-01");
        assert_eq!(filters["listingDate"]["lte"], "2026-09-01");
        assert_eq!(payload["variables"]["page"], 3);
        assert_eq!(payload["variables"]["pageSize"], 20);
        assert!(
            payload["query"]
                .as_str()
                .unwrap()
                .contains("eventListings")
        );
    }

    #[test]
    fn parse_page_returns_items() {
        let body = r#"{"data": {"eventListings": {"data": [
            {"event": {"title": "A", "contentUrl": "/events/1"}},
            {"event": {"title": "B", "contentUrl": "/events/2"}}
        ]}}}"#;
        let items = parse_page(body).unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn parse_page_empty_signals_end_of_data() {
        let body = r#"{"data": {"eventListings": {"data": []}}}"#;
        assert!(parse_page(body).unwrap().is_empty());
    }

    #[test]
    fn parse_page_missing_envelope_is_empty() {
        assert!(parse_page("{}").unwrap().is_empty());
    }

    #[test]
    fn parse_page_error_payload_is_fatal() {
        let body = r#"{"errors": [{"message": "rate limited"}, {"message": "try later"}]}"#;
        let err = parse_page(body).unwrap_err();
        let text = err.to_string();
        assert!(text.contains("rate limited"));
        assert!(text.contains("try later"));
    }

    #[test]
    fn parse_page_malformed_body_is_fatal() {
        assert!(parse_page("<html>busy</html>").is_err());
    }
}
