//! Configuration structures for DigitalOcean clients.
//!
//! [`ApiConfig`] is the deserializable form of the client settings. Loading
//! it (file, environment, secret store) is left to the caller; this module
//! only validates it and turns it into a [`ClientConfig`].

use crate::client::{ClientConfig, DEFAULT_API_URL, DEFAULT_POOL_MAX_IDLE_PER_HOST};
use crate::Error;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use std::time::Duration;
use validator::{Validate, ValidationError};

/// Settings for a DigitalOcean API client.
#[derive(Debug, Deserialize, Validate)]
pub struct ApiConfig {
    /// API base URL, including the version prefix
    #[validate(url)]
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Bearer token, checked separately by [`ApiConfig::check`]
    #[serde(deserialize_with = "deserialize_secret")]
    token: SecretString,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Maximum idle pooled connections per host
    #[validate(range(min = 1, max = 256))]
    #[serde(default = "default_pool_max_idle")]
    pub pool_max_idle_per_host: usize,

    /// Optional `User-Agent` override
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

const fn default_request_timeout_secs() -> u64 {
    30
}

const fn default_pool_max_idle() -> usize {
    DEFAULT_POOL_MAX_IDLE_PER_HOST
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

fn validate_token(token: &SecretString) -> Result<(), ValidationError> {
    let token = token.expose_secret();
    if token.trim().is_empty() {
        return Err(ValidationError::new("empty_token"));
    }
    if token.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(ValidationError::new("token_has_whitespace"));
    }
    Ok(())
}

impl ApiConfig {
    /// Create a configuration for the production endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty or malformed.
    pub fn new(token: impl Into<String>) -> Result<Self, Error> {
        let config = Self {
            api_url: default_api_url(),
            token: SecretString::from(token.into()),
            request_timeout_secs: default_request_timeout_secs(),
            pool_max_idle_per_host: default_pool_max_idle(),
            user_agent: None,
        };

        config.check()?;
        Ok(config)
    }

    /// Point the client at a different API endpoint.
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Set the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// The bearer token.
    #[must_use]
    pub const fn token(&self) -> &SecretString {
        &self.token
    }

    /// Request timeout as a duration.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate all settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] for a malformed token, otherwise one
    /// describing every failed field check.
    pub fn check(&self) -> Result<(), Error> {
        validate_token(&self.token)
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: token: {e}")))?;
        self.validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))
    }

    /// HTTP transport settings derived from this configuration.
    #[must_use]
    pub const fn client_config(&self) -> ClientConfig {
        ClientConfig::new()
            .with_timeout(self.request_timeout())
            .with_pool_max_idle(self.pool_max_idle_per_host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_defaults() {
        let config = ApiConfig::new("foobartoken").unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.token().expose_secret(), "foobartoken");
        assert!(config.user_agent.is_none());
    }

    #[test]
    fn test_empty_token_rejected() {
        let err = ApiConfig::new("  ").unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn test_token_with_newline_rejected() {
        assert!(ApiConfig::new("abc\ndef").is_err());
    }

    #[test]
    fn test_deserialized_empty_token_rejected_by_check() {
        let config: ApiConfig = serde_json::from_str(r#"{"token": ""}"#).unwrap();
        let err = config.check().unwrap_err();
        assert!(matches!(err, Error::ConfigError(ref msg) if msg.contains("token")));
    }

    #[test]
    fn test_builder_overrides() {
        let config = ApiConfig::new("token")
            .unwrap()
            .with_api_url("http://localhost:4444")
            .with_timeout(5)
            .with_user_agent("terraform-provider/1.0");

        assert!(config.check().is_ok());
        assert_eq!(config.api_url, "http://localhost:4444");
        assert_eq!(config.client_config().timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent.as_deref(), Some("terraform-provider/1.0"));
    }

    #[test]
    fn test_invalid_timeout_rejected() {
        let config = ApiConfig::new("token").unwrap().with_timeout(0);
        assert!(config.check().is_err());
    }

    #[test]
    fn test_invalid_url_rejected() {
        let config = ApiConfig::new("token").unwrap().with_api_url("not a url");
        assert!(config.check().is_err());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: ApiConfig = serde_json::from_str(r#"{"token": "abc123"}"#).unwrap();
        assert!(config.check().is_ok());
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.pool_max_idle_per_host, DEFAULT_POOL_MAX_IDLE_PER_HOST);
        assert_eq!(config.token().expose_secret(), "abc123");
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = ApiConfig::new("supersecret").unwrap();
        assert!(!format!("{config:?}").contains("supersecret"));
    }
}
