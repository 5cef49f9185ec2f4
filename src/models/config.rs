// src/models/config.rs

//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Upstream listings API settings
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Ingestion run settings
    #[serde(default)]
    pub ingest: IngestConfig,

    /// Database settings
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.upstream.endpoint.trim().is_empty() {
            return Err(AppError::validation("upstream.endpoint is empty"));
        }
        if self.upstream.site_base_url.trim().is_empty() {
            return Err(AppError::validation("upstream.site_base_url is empty"));
        }
        if self.upstream.user_agent.trim().is_empty() {
            return Err(AppError::validation("upstream.user_agent is empty"));
        }
        if self.upstream.timeout_secs == 0 {
            return Err(AppError::validation("upstream.timeout_secs must be > 0"));
        }
        if self.upstream.page_size == 0 {
            return Err(AppError::validation("upstream.page_size must be > 0"));
        }
        if self.ingest.window_days == 0 {
            return Err(AppError::validation("ingest.window_days must be > 0"));
        }
        if self.database.url.trim().is_empty() {
            return Err(AppError::validation("database.url is empty"));
        }
        Ok(())
    }
}

/// Upstream listings API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// GraphQL endpoint accepting the paged listings query
    #[serde(default = "defaults::endpoint")]
    pub endpoint: String,

    /// Base URL prepended to relative content paths (source/buy links)
    #[serde(default = "defaults::site_base_url")]
    pub site_base_url: String,

    /// Base URL prepended to flyer image filenames
    #[serde(default = "defaults::image_base_url")]
    pub image_base_url: String,

    /// Upstream area identifier for the city being watched
    #[serde(default = "defaults::area_id")]
    pub area_id: u32,

    /// Listings requested per page
    #[serde(default = "defaults::page_size")]
    pub page_size: u32,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Referer header expected by the listings endpoint
    #[serde(default = "defaults::referer")]
    pub referer: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Mandatory delay between page requests in milliseconds
    #[serde(default = "defaults::page_delay")]
    pub page_delay_ms: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::endpoint(),
            site_base_url: defaults::site_base_url(),
            image_base_url: defaults::image_base_url(),
            area_id: defaults::area_id(),
            page_size: defaults::page_size(),
            user_agent: defaults::user_agent(),
            referer: defaults::referer(),
            timeout_secs: defaults::timeout(),
            page_delay_ms: defaults::page_delay(),
        }
    }
}

/// Ingestion run settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Length of the fetch window in days, starting today
    #[serde(default = "defaults::window_days")]
    pub window_days: u32,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            window_days: defaults::window_days(),
        }
    }
}

/// Database settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite connection URL
    #[serde(default = "defaults::database_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: defaults::database_url(),
        }
    }
}

mod defaults {
    // Upstream defaults
    pub fn endpoint() -> String {
        "https://ra.co/graphql".into()
    }
    pub fn site_base_url() -> String {
        "https://ra.co".into()
    }
    pub fn image_base_url() -> String {
        "https://images.ra.co/".into()
    }
    pub fn area_id() -> u32 {
        // Barcelona
        20
    }
    pub fn page_size() -> u32 {
        20
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) Gecko/20100101 Firefox/117.0".into()
    }
    pub fn referer() -> String {
        "https://ra.co/events/es/barcelona".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn page_delay() -> u64 {
        1000
    }

    // Ingest defaults
    pub fn window_days() -> u32 {
        365
    }

    // Database defaults
    pub fn database_url() -> String {
        "sqlite://techno_events.db".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_endpoint() {
        let mut config = Config::default();
        config.upstream.endpoint = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_window() {
        let mut config = Config::default();
        config.ingest.window_days = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn parses_partial_toml_with_defaults() {
        let config: Config = toml::from_str(
            r#"
            [upstream]
            area_id = 13
            page_delay_ms = 250

            [ingest]
            window_days = 30
            "#,
        )
        .unwrap();

        assert_eq!(config.upstream.area_id, 13);
        assert_eq!(config.upstream.page_delay_ms, 250);
        assert_eq!(config.ingest.window_days, 30);
        // untouched sections keep their defaults
        assert_eq!(config.upstream.endpoint, "https://ra.co/graphql");
        assert_eq!(config.database.url, "sqlite://techno_events.db");
    }
}
