use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::CoreError;

use super::cache::CacheTtls;

pub const DEFAULT_BASE_URL: &str = "https://app.ticketmaster.com/discovery/v2";
pub const DEFAULT_COUNTRY_CODE: &str = "US";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

pub const ENV_API_KEY: &str = "TICKETMASTER_API_KEY";
pub const ENV_BASE_URL: &str = "TICKETMASTER_BASE_URL";
pub const ENV_REQUEST_TIMEOUT: &str = "STOREFRONT_REQUEST_TIMEOUT_SECS";

/// Retry budget for upstream calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Attempts in total, the first one included.
    pub max_attempts: u32,
    /// Wait before a retry after a generic transient failure.
    pub base_delay_ms: u64,
    /// Multiplier applied to `base_delay_ms` after an HTTP 429.
    pub rate_limit_multiplier: u32,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
            rate_limit_multiplier: 2,
        }
    }
}

/// Geo-search radius and how far an empty result may widen it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadiusPolicy {
    /// Miles, used when coordinates are given without an explicit radius.
    pub default_radius: u32,
    /// Miles added on each widening.
    pub step: u32,
    /// How many times an empty geo search is retried with a wider radius.
    pub max_widenings: u32,
}

impl Default for RadiusPolicy {
    fn default() -> Self {
        Self {
            default_radius: 50,
            step: 50,
            max_widenings: 1,
        }
    }
}

/// Everything the gateway needs to talk to the Discovery API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Discovery API key. Empty means "not configured".
    pub api_key: String,

    pub base_url: String,

    /// Fixed country filter on every search.
    pub country_code: String,

    /// Socket timeout per request, in seconds.
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub cache_ttls: CacheTtls,

    #[serde(default)]
    pub retry: RetrySettings,

    #[serde(default)]
    pub radius: RadiusPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            country_code: DEFAULT_COUNTRY_CODE.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            cache_ttls: CacheTtls::default(),
            retry: RetrySettings::default(),
            radius: RadiusPolicy::default(),
        }
    }
}

impl Settings {
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Read settings from the process environment.
    ///
    /// Only the API key is required to be meaningful; a missing key is left
    /// empty and reported by [`Settings::validate`] before the first request.
    pub fn from_env() -> Result<Self, CoreError> {
        let mut settings = Self {
            api_key: std::env::var(ENV_API_KEY).unwrap_or_default(),
            ..Self::default()
        };
        if let Ok(url) = std::env::var(ENV_BASE_URL) {
            if !url.trim().is_empty() {
                settings.base_url = url.trim().trim_end_matches('/').to_string();
            }
        }
        if let Ok(raw) = std::env::var(ENV_REQUEST_TIMEOUT) {
            settings.request_timeout_secs = raw.trim().parse().map_err(|_| {
                CoreError::Configuration(format!(
                    "{ENV_REQUEST_TIMEOUT} must be a whole number of seconds, got '{raw}'"
                ))
            })?;
        }
        Ok(settings)
    }

    /// Fail fast on a configuration that cannot possibly work.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.api_key.trim().is_empty() {
            return Err(CoreError::Configuration(
                "Ticketmaster API key is not configured".into(),
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(CoreError::Configuration(
                "retry.max_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
