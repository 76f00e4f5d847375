//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `BASIL_API_BASE_URL` - Base URL of the storefront API
//!   (e.g., `https://shop.example.com/api/spa/`)
//!
//! ## Optional
//! - `BASIL_HTTP_TIMEOUT_SECS` - Per-request timeout in seconds (default: 30)
//! - `BASIL_USER_AGENT` - User-Agent header value (default: `basil-client/0.1`)

use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default User-Agent header.
const DEFAULT_USER_AGENT: &str = "basil-client/0.1";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront API client configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the API; all endpoint paths are joined onto this.
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = parse_base_url(&get_required_env("BASIL_API_BASE_URL")?)?;

        let timeout_secs = get_env_or_default(
            "BASIL_HTTP_TIMEOUT_SECS",
            &DEFAULT_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("BASIL_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
        })?;

        let user_agent = get_env_or_default("BASIL_USER_AGENT", DEFAULT_USER_AGENT);

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            user_agent,
        })
    }

    /// Build a configuration directly from a base URL string.
    ///
    /// Used by tests and tools that point the client at a known endpoint
    /// without going through the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the URL is not valid HTTP(S).
    pub fn for_base_url(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        })
    }
}

/// Parse and normalize the API base URL.
///
/// The path is forced to end with `/` so that `Url::join` with relative
/// endpoint paths appends rather than replaces the final segment.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid =
        |msg: &str| ConfigError::InvalidEnvVar("BASIL_API_BASE_URL".to_string(), msg.to_string());

    let mut url = Url::parse(raw).map_err(|e| invalid(&e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }

    if !url.path().ends_with('/') {
        url.set_path(&format!("{}/", url.path()));
    }

    Ok(url)
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_url_appends_trailing_slash() {
        let url = parse_base_url("http://localhost:8000/api/spa").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/spa/");

        // Joining must append, not replace the last segment
        assert_eq!(
            url.join("cart/").unwrap().as_str(),
            "http://localhost:8000/api/spa/cart/"
        );
    }

    #[test]
    fn test_parse_base_url_keeps_existing_slash() {
        let url = parse_base_url("http://localhost:8000/api/spa/").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/spa/");
    }

    #[test]
    fn test_parse_base_url_rejects_non_http() {
        assert!(parse_base_url("ftp://example.com/").is_err());
        assert!(parse_base_url("not a url").is_err());
    }

    #[test]
    fn test_for_base_url_defaults() {
        let config = StoreConfig::for_base_url("https://shop.example.com/api/spa/").unwrap();
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }
}
