//! Client configuration.
//!
//! Everything has a sensible default; only the backend address can be
//! overridden from the environment (`CATALOG_API_BASE`).

use crate::controller::HIGHLIGHT_WINDOW;
use crate::model::{PageSize, Sort};
use catalog_runtime::DEFAULT_NOTIFICATION_TTL;
use reqwest::Url;
use std::time::Duration;
use thiserror::Error;

pub const BASE_URL_ENV: &str = "CATALOG_API_BASE";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/products";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Collection URL of the product API.
    pub base_url: String,
    /// Quiet period before search text is queried.
    pub debounce: Duration,
    pub highlight_window: Duration,
    pub notification_ttl: Duration,
    pub default_size: PageSize,
    pub default_sort: Sort,
    pub mailbox_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            debounce: Duration::from_millis(300),
            highlight_window: HIGHLIGHT_WINDOW,
            notification_ttl: DEFAULT_NOTIFICATION_TTL,
            default_size: PageSize::default(),
            default_sort: Sort::default(),
            mailbox_capacity: 32,
        }
    }
}

impl ClientConfig {
    /// Defaults, with the base URL taken from `CATALOG_API_BASE` when set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            config.base_url = base_url;
        }
        config.endpoint()?;
        Ok(config)
    }

    /// The validated base URL.
    pub fn endpoint(&self) -> Result<Url, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason,
        };
        let url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", url.scheme())));
        }
        if url.cannot_be_a_base() {
            return Err(invalid("not a hierarchical URL".to_string()));
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.debounce, Duration::from_millis(300));
        assert_eq!(config.highlight_window, Duration::from_millis(1800));
        assert_eq!(config.notification_ttl, Duration::from_millis(2500));
        assert_eq!(config.default_size, PageSize::Ten);
        assert_eq!(config.default_sort.to_string(), "id,desc");
        assert_eq!(
            config.endpoint().unwrap().as_str(),
            "http://localhost:8080/api/products"
        );
    }

    #[test]
    fn test_rejects_bad_base_urls() {
        for url in ["not a url", "ftp://example.com/products", "mailto:ops@example.com"] {
            let config = ClientConfig {
                base_url: url.to_string(),
                ..ClientConfig::default()
            };
            assert!(
                matches!(config.endpoint(), Err(ConfigError::InvalidBaseUrl { .. })),
                "{url} should be rejected"
            );
        }
    }
}
