//! Configuration management for the auction desk.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::batch::{BatchSettings, DEFAULT_MAX_CONCURRENCY};
use auction_desk_client::ClientConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// API base URL is not an http(s) URL
    #[error("Invalid API URL: {0}")]
    InvalidApiUrl(String),

    /// Request timeout of zero seconds
    #[error("Request timeout must be at least one second")]
    ZeroTimeout,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeskConfig {
    /// Backend API configuration
    pub api: ApiConfig,
    /// Batch dispatch configuration
    pub batch: BatchSettings,
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL, e.g. `http://localhost:8080/api`
    pub base_url: String,
    /// Bearer token, if the backend requires one
    #[serde(skip_serializing)]
    pub token: Option<String>,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl DeskConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            api: ApiConfig {
                base_url: lookup("AUCTION_API_URL")
                    .unwrap_or_else(|| "http://localhost:8080/api".to_string()),
                token: lookup("AUCTION_API_TOKEN").filter(|token| !token.trim().is_empty()),
                request_timeout_secs: lookup("AUCTION_REQUEST_TIMEOUT_SECS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            },
            batch: BatchSettings {
                max_concurrency: lookup("AUCTION_MAX_CONCURRENT_REQUESTS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_MAX_CONCURRENCY),
                preflight: lookup("AUCTION_PREFLIGHT")
                    .map(|s| matches!(s.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
                    .unwrap_or(false),
            },
        }
    }

    /// Check the values that can't be defaulted away.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a non-http(s) base URL or a zero timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidApiUrl(self.api.base_url.clone()));
        }
        if self.api.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    /// HTTP client configuration derived from this config
    #[must_use]
    pub fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::new(self.api.base_url.trim())
            .with_timeout(Duration::from_secs(self.api.request_timeout_secs));
        match &self.api.token {
            Some(token) => config.with_token(token.clone()),
            None => config,
        }
    }
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
