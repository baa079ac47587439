//! Configuration types.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Default base URL for the campaign API (poll / reply / messages endpoints).
pub const DEFAULT_API_URL: &str = "https://api.outreach.app";

/// Hosted backend (table + auth API) configuration.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL of the hosted backend project.
    pub base_url: String,
    /// Publishable anon key sent with every request.
    pub anon_key: SecretString,
}

impl BackendConfig {
    /// Build config from environment variables. Both values are required —
    /// there is no meaningful default for a hosted project.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var("OUTREACH_BACKEND_URL")
            .map_err(|_| ConfigError::MissingEnvVar("OUTREACH_BACKEND_URL".into()))?;
        let anon_key = std::env::var("OUTREACH_BACKEND_ANON_KEY")
            .map_err(|_| ConfigError::MissingEnvVar("OUTREACH_BACKEND_ANON_KEY".into()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: SecretString::from(anon_key),
        })
    }
}

/// Campaign API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    /// Build config from the environment, falling back to the hosted default.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("OUTREACH_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
        }
    }
}

/// Poll adapter tuning.
///
/// The attempt bound is carried here as configuration so the retry path is
/// an explicit loop, never open-ended recursion driven by a 429 response.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Overall budget covering every attempt and backoff.
    pub resource_timeout: Duration,
    /// Fixed delay before the single rate-limit retry.
    pub retry_delay: Duration,
    /// Maximum network attempts per poll call.
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            resource_timeout: Duration::from_secs(300),
            retry_delay: Duration::from_secs(2),
            max_attempts: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_config_default_base_url() {
        assert_eq!(ApiConfig::default().base_url, DEFAULT_API_URL);
    }

    #[test]
    fn poll_config_defaults() {
        let config = PollConfig::default();
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.resource_timeout, Duration::from_secs(300));
        assert_eq!(config.retry_delay, Duration::from_secs(2));
        assert_eq!(config.max_attempts, 2);
    }
}
