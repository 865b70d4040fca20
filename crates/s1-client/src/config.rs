//! Client configuration.
//!
//! Holds the tenant console URL, the API token and transport settings. The
//! value is built once by the caller and handed to [`crate::S1Client::new`];
//! nothing in this crate reads configuration from the process environment.

use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::retry::RetryConfig;

/// Versioned base path of the management REST API.
pub const API_BASE_PATH: &str = "/web/api/v2.1";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required value is missing.
    #[error("missing required configuration value: {0}")]
    MissingValue(String),

    /// Invalid configuration value.
    #[error("invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },
}

/// Connection settings for one management console.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Console URL (e.g. "https://usea1-acme.sentinelone.net").
    pub tenant_url: String,

    /// API token sent as `Authorization: ApiToken <key>`.
    pub api_key: String,

    /// Request timeout in seconds; `None` keeps the HTTP client default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Extra attempts for failed lookups (0 means a single attempt).
    #[serde(default)]
    pub max_retries: u32,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("tenant_url", &self.tenant_url)
            .field("api_key", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl ClientConfig {
    /// Creates a configuration for the given console and token.
    pub fn new(tenant_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            tenant_url: tenant_url.into(),
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = Some(timeout.as_secs());
        self
    }

    /// Set the number of extra lookup attempts.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Get the request timeout as a Duration, if one is configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Retry policy for idempotent lookups.
    pub fn retry_config(&self) -> RetryConfig {
        if self.max_retries == 0 {
            return RetryConfig::no_retry();
        }
        RetryConfig {
            max_attempts: self.max_retries.saturating_add(1),
            ..RetryConfig::default()
        }
    }

    /// Build the full URL of an API endpoint.
    ///
    /// `endpoint` is relative to [`API_BASE_PATH`] and starts with `/`.
    pub fn api_url(&self, endpoint: &str) -> String {
        let base = self.tenant_url.trim_end_matches('/');
        format!("{}{}/{}", base, API_BASE_PATH, endpoint.trim_start_matches('/'))
    }

    /// Validate that the settings are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingValue("api_key".to_string()));
        }
        if self.tenant_url.trim().is_empty() {
            return Err(ConfigError::MissingValue("tenant_url".to_string()));
        }

        let url = Url::parse(&self.tenant_url).map_err(|e| ConfigError::InvalidValue {
            key: "tenant_url".to_string(),
            message: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                key: "tenant_url".to_string(),
                message: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert!(config.timeout().is_none());
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.retry_config().max_attempts, 1);
    }

    #[test]
    fn test_api_url() {
        let config = ClientConfig::new("https://console.example.com", "key");
        assert_eq!(
            config.api_url("/accounts"),
            "https://console.example.com/web/api/v2.1/accounts"
        );
        assert_eq!(
            config.api_url("users/login/send-reset-password-email"),
            "https://console.example.com/web/api/v2.1/users/login/send-reset-password-email"
        );
    }

    #[test]
    fn test_api_url_trailing_slash() {
        let config = ClientConfig::new("https://console.example.com/", "key");
        assert_eq!(
            config.api_url("/rbac/roles"),
            "https://console.example.com/web/api/v2.1/rbac/roles"
        );
    }

    #[test]
    fn test_retry_config_from_max_retries() {
        let config = ClientConfig::new("https://console.example.com", "key").with_max_retries(2);
        assert_eq!(config.retry_config().max_attempts, 3);
    }

    #[test]
    fn test_validate() {
        assert!(matches!(
            ClientConfig::new("https://console.example.com", "").validate(),
            Err(ConfigError::MissingValue(key)) if key == "api_key"
        ));
        assert!(matches!(
            ClientConfig::new("", "key").validate(),
            Err(ConfigError::MissingValue(key)) if key == "tenant_url"
        ));
        assert!(matches!(
            ClientConfig::new("console.example.com", "key").validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            ClientConfig::new("ftp://console.example.com", "key").validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(ClientConfig::new("https://console.example.com", "key")
            .validate()
            .is_ok());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = ClientConfig::new("https://console.example.com", "super-secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
