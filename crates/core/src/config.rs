//! Configuration types

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{CoreError, CoreResult};

pub const DEFAULT_PRICES_URL: &str = "https://interview.switcheo.com/prices.json";
pub const DEFAULT_ICON_BASE_PATH: &str = "/icons";

/// Price feed configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub prices_url: String,
    pub icon_base_path: String,
    pub poll_interval_ms: u64,
    pub stale_after_ms: u64,
    /// No timeout unless set; a hung request just leaves the last quotes up
    pub request_timeout_ms: Option<u64>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            prices_url: DEFAULT_PRICES_URL.to_string(),
            icon_base_path: DEFAULT_ICON_BASE_PATH.to_string(),
            poll_interval_ms: 10_000,
            stale_after_ms: 30_000,
            request_timeout_ms: None,
        }
    }
}

impl FeedConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn stale_after(&self) -> Duration {
        Duration::from_millis(self.stale_after_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

/// Swap form configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    pub refetch_debounce_ms: u64,
    pub swap_delay_ms: u64,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            refetch_debounce_ms: 250,
            swap_delay_ms: 2_000,
        }
    }
}

impl FormConfig {
    pub fn refetch_debounce(&self) -> Duration {
        Duration::from_millis(self.refetch_debounce_ms)
    }

    pub fn swap_delay(&self) -> Duration {
        Duration::from_millis(self.swap_delay_ms)
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub feed: FeedConfig,
    pub form: FormConfig,
}

impl AppConfig {
    pub fn validate(&self) -> CoreResult<()> {
        if self.feed.prices_url.trim().is_empty() {
            return Err(CoreError::InvalidConfig("feed.prices_url is empty".to_string()));
        }
        if self.feed.poll_interval_ms == 0 {
            return Err(CoreError::InvalidConfig(
                "feed.poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.feed.stale_after_ms < self.feed.poll_interval_ms {
            return Err(CoreError::InvalidConfig(format!(
                "feed.stale_after_ms ({}) is shorter than the poll interval ({})",
                self.feed.stale_after_ms, self.feed.poll_interval_ms
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.feed.poll_interval(), Duration::from_secs(10));
        assert_eq!(config.feed.stale_after(), Duration::from_secs(30));
        assert_eq!(config.feed.request_timeout(), None);
        assert_eq!(config.form.refetch_debounce(), Duration::from_millis(250));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"feed":{"poll_interval_ms":30000,"stale_after_ms":60000}}"#).unwrap();

        assert_eq!(config.feed.poll_interval_ms, 30_000);
        assert_eq!(config.feed.prices_url, DEFAULT_PRICES_URL);
        assert_eq!(config.form, FormConfig::default());
    }

    #[test]
    fn test_invalid_intervals_rejected() {
        let mut config = AppConfig::default();
        config.feed.poll_interval_ms = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.feed.stale_after_ms = 1_000;
        assert!(config.validate().is_err());
    }
}
