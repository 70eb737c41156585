//! Configuration management for the fixer API client

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Built-in production backend, used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "https://ci-cd-fixer-agent-backend.onrender.com";

/// Environment variable holding the backend base URL.
pub const API_URL_ENV: &str = "FIXER_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the fixer agent backend
    pub api_url: String,

    /// HTTP timeout for backend requests
    pub http_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            http_timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::resolve(None)
    }

    /// Resolve configuration with an optional explicit base URL.
    ///
    /// Base URL resolution order: explicit argument, then the
    /// `FIXER_API_URL` environment variable, then the compiled-in
    /// production default.
    pub fn resolve(explicit_api_url: Option<String>) -> Self {
        let mut config = Config::default();

        config.api_url =
            Self::resolve_api_url(explicit_api_url, env::var(API_URL_ENV).ok());

        if let Ok(timeout) = env::var("HTTP_TIMEOUT_SECONDS") {
            if let Ok(seconds) = timeout.parse::<u64>() {
                config.http_timeout = Duration::from_secs(seconds);
            }
        }

        config
    }

    /// Pick the base URL from the ordered provider chain.
    fn resolve_api_url(explicit: Option<String>, env_value: Option<String>) -> String {
        explicit
            .filter(|url| !url.is_empty())
            .or(env_value.filter(|url| !url.is_empty()))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.api_url.is_empty() {
            return Err("api_url cannot be empty".to_string());
        }

        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(format!("api_url must be an http(s) URL: {}", self.api_url));
        }

        if self.http_timeout.is_zero() {
            return Err("http_timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_url_wins_over_env() {
        let url = Config::resolve_api_url(
            Some("http://localhost:8000".to_string()),
            Some("http://from-env:9000".to_string()),
        );
        assert_eq!(url, "http://localhost:8000");
    }

    #[test]
    fn test_env_url_wins_over_default() {
        let url = Config::resolve_api_url(None, Some("http://from-env:9000".to_string()));
        assert_eq!(url, "http://from-env:9000");
    }

    #[test]
    fn test_default_url_when_nothing_set() {
        let url = Config::resolve_api_url(None, None);
        assert_eq!(url, DEFAULT_API_URL);
    }

    #[test]
    fn test_empty_explicit_url_falls_through() {
        let url = Config::resolve_api_url(
            Some(String::new()),
            Some("http://from-env:9000".to_string()),
        );
        assert_eq!(url, "http://from-env:9000");
    }

    #[test]
    fn test_validate_rejects_non_http_url() {
        let config = Config {
            api_url: "ftp://example.com".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_default() {
        assert!(Config::default().validate().is_ok());
    }
}
