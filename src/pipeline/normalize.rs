// src/pipeline/normalize.rs

//! Per-item normalization of raw listings into event drafts.
//!
//! Failure here is always local to one item: the caller logs the error
//! (which carries the item's best-effort title) and moves on.

use chrono::{DateTime, FixedOffset, NaiveDateTime};

use crate::error::{AppError, Result};
use crate::models::{ARTISTS_TBC, CLUB_TBA, EventDraft, RawListingItem, UpstreamConfig};

/// Map one raw listing item into a complete event draft.
pub fn normalize(item: &RawListingItem, config: &UpstreamConfig) -> Result<EventDraft> {
    let event = item
        .event
        .as_ref()
        .ok_or_else(|| AppError::normalize("(unknown)", "listing item has no event payload"))?;
    let title = event.best_title().to_string();

    let event_name = event
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::normalize(&title, "missing title"))?
        .to_string();

    let start = parse_timestamp(required(&event.date, "date", &title)?, "date", &title)?;
    let start_clock = parse_timestamp(
        required(&event.start_time, "startTime", &title)?,
        "startTime",
        &title,
    )?;
    let end_clock = parse_timestamp(
        required(&event.end_time, "endTime", &title)?,
        "endTime",
        &title,
    )?;

    let content_path = event
        .content_url
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::normalize(&title, "missing contentUrl"))?;
    let source_link = format!("{}{}", config.site_base_url, content_path);

    let names: Vec<&str> = event
        .artists
        .iter()
        .filter_map(|a| a.name.as_deref())
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .collect();
    let artists = if names.is_empty() {
        ARTISTS_TBC.to_string()
    } else {
        names.join(", ")
    };

    let club_name = event
        .venue
        .as_ref()
        .and_then(|v| v.name.as_deref())
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(CLUB_TBA)
        .to_string();

    let flyer_image = event
        .images
        .first()
        .and_then(|i| i.filename.as_deref())
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(|f| format!("{}{}", config.image_base_url, f))
        .unwrap_or_default();

    Ok(EventDraft {
        event_name,
        club_name,
        event_date: start.date_naive(),
        start_time: start_clock.format("%H:%M").to_string(),
        end_time: end_clock.format("%H:%M").to_string(),
        artists,
        attending_count: event.attending.unwrap_or(0).max(0),
        buy_link: source_link.clone(),
        source_link,
        flyer_image,
    })
}

fn required<'a>(value: &'a Option<String>, field: &str, title: &str) -> Result<&'a str> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::normalize(title, format!("missing {field}")))
}

/// Parse an upstream ISO-8601 timestamp.
///
/// Upstream marks UTC with a bare `Z` suffix, rewritten to an explicit
/// offset before parsing. Timestamps without any offset are taken as local
/// clock time; no timezone shifting happens in either case.
fn parse_timestamp(raw: &str, field: &str, title: &str) -> Result<DateTime<FixedOffset>> {
    let explicit = match raw.trim().strip_suffix('Z') {
        Some(stem) => format!("{stem}+00:00"),
        None => raw.trim().to_string(),
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(&explicit) {
        return Ok(parsed);
    }

    explicit
        .parse::<NaiveDateTime>()
        .map(|naive| naive.and_utc().fixed_offset())
        .map_err(|e| AppError::normalize(title, format!("unparseable {field} '{raw}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(json: serde_json::Value) -> RawListingItem {
        serde_json::from_value(json).unwrap()
    }

    fn config() -> UpstreamConfig {
        UpstreamConfig::default()
    }

    #[test]
    fn normalizes_complete_item() {
        let raw = item(serde_json::json!({
            "event": {
                "title": "X",
                "date": "2025-10-01T22:00:00Z",
                "startTime": "2025-10-01T22:00:00Z",
                "endTime": "2025-10-02T06:00:00Z",
                "venue": {"name": "Y"},
                "artists": [],
                "images": [],
                "contentUrl": "/events/1"
            }
        }));

        let draft = normalize(&raw, &config()).unwrap();
        assert_eq!(draft.event_name, "X");
        assert_eq!(draft.club_name, "Y");
        assert_eq!(draft.event_date.to_string(), "2025-10-01");
        assert_eq!(draft.start_time, "22:00");
        assert_eq!(draft.end_time, "06:00");
        assert_eq!(draft.artists, "artists to be confirmed");
        assert_eq!(draft.flyer_image, "");
        assert_eq!(draft.source_link, "https://ra.co/events/1");
        assert_eq!(draft.buy_link, draft.source_link);
        assert_eq!(draft.attending_count, 0);
    }

    #[test]
    fn joins_artist_names_and_drops_blank_entries() {
        let raw = item(serde_json::json!({
            "event": {
                "title": "X",
                "date": "2025-10-01T22:00:00Z",
                "startTime": "2025-10-01T22:00:00Z",
                "endTime": "2025-10-02T06:00:00Z",
                "artists": [{"name": "DJ A"}, {"name": "  "}, {}, {"name": "DJ B"}],
                "contentUrl": "/events/1"
            }
        }));

        let draft = normalize(&raw, &config()).unwrap();
        assert_eq!(draft.artists, "DJ A, DJ B");
    }

    #[test]
    fn missing_venue_falls_back_to_tba() {
        let raw = item(serde_json::json!({
            "event": {
                "title": "X",
                "date": "2025-10-01T22:00:00Z",
                "startTime": "2025-10-01T22:00:00Z",
                "endTime": "2025-10-02T06:00:00Z",
                "contentUrl": "/events/1"
            }
        }));

        let draft = normalize(&raw, &config()).unwrap();
        assert_eq!(draft.club_name, "TBA");
    }

    #[test]
    fn first_image_becomes_flyer_url() {
        let raw = item(serde_json::json!({
            "event": {
                "title": "X",
                "date": "2025-10-01T22:00:00Z",
                "startTime": "2025-10-01T22:00:00Z",
                "endTime": "2025-10-02T06:00:00Z",
                "images": [{"filename": "flyer.jpg"}, {"filename": "other.jpg"}],
                "contentUrl": "/events/1",
                "attending": 120
            }
        }));

        let draft = normalize(&raw, &config()).unwrap();
        assert_eq!(draft.flyer_image, "https://images.ra.co/flyer.jpg");
        assert_eq!(draft.attending_count, 120);
    }

    #[test]
    fn empty_image_filename_means_no_flyer() {
        let raw = item(serde_json::json!({
            "event": {
                "title": "X",
                "date": "2025-10-01T22:00:00Z",
                "startTime": "2025-10-01T22:00:00Z",
                "endTime": "2025-10-02T06:00:00Z",
                "images": [{"filename": ""}],
                "contentUrl": "/events/1"
            }
        }));

        let draft = normalize(&raw, &config()).unwrap();
        assert_eq!(draft.flyer_image, "");
    }

    #[test]
    fn accepts_timestamps_without_offset() {
        let raw = item(serde_json::json!({
            "event": {
                "title": "X",
                "date": "2025-10-01T22:00:00.000",
                "startTime": "2025-10-01T22:00:00.000",
                "endTime": "2025-10-02T06:00:00.000",
                "contentUrl": "/events/1"
            }
        }));

        let draft = normalize(&raw, &config()).unwrap();
        assert_eq!(draft.event_date.to_string(), "2025-10-01");
        assert_eq!(draft.start_time, "22:00");
        assert_eq!(draft.end_time, "06:00");
    }

    #[test]
    fn malformed_date_is_a_local_error() {
        let raw = item(serde_json::json!({
            "event": {
                "title": "Broken",
                "date": "next friday",
                "startTime": "2025-10-01T22:00:00Z",
                "endTime": "2025-10-02T06:00:00Z",
                "contentUrl": "/events/1"
            }
        }));

        let err = normalize(&raw, &config()).unwrap_err();
        assert!(matches!(err, AppError::Normalize { ref title, .. } if title == "Broken"));
    }

    #[test]
    fn item_without_event_payload_is_an_error() {
        let raw = item(serde_json::json!({}));
        assert!(normalize(&raw, &config()).is_err());
    }

    #[test]
    fn missing_content_url_is_an_error() {
        let raw = item(serde_json::json!({
            "event": {
                "title": "X",
                "date": "2025-10-01T22:00:00Z",
                "startTime": "2025-10-01T22:00:00Z",
                "endTime": "2025-10-02T06:00:00Z"
            }
        }));
        assert!(normalize(&raw, &config()).is_err());
    }
}
