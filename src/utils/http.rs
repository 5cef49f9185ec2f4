// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, REFERER};

use crate::error::{AppError, Result};
use crate::models::UpstreamConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_client(config: &UpstreamConfig) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    if !config.referer.is_empty() {
        let value = HeaderValue::from_str(&config.referer)
            .map_err(|e| AppError::config(format!("invalid upstream.referer: {e}")))?;
        headers.insert(REFERER, value);
    }

    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_client_from_defaults() {
        let config = UpstreamConfig::default();
        assert!(create_client(&config).is_ok());
    }

    #[test]
    fn rejects_unencodable_referer() {
        let config = UpstreamConfig {
            referer: "https://ra.co/\n".to_string(),
            ..UpstreamConfig::default()
        };
        assert!(create_client(&config).is_err());
    }
}
