//! Error types for the storefront API client.
//!
//! The taxonomy maps HTTP outcomes onto four cases: transport failure,
//! authentication required (401/403), rejected request (4xx with a
//! server-provided message, surfaced verbatim), and server fault (5xx).
//! No variant carries retry semantics; every failure is terminal for the
//! attempt and the caller decides whether to try again.

use thiserror::Error;

/// Errors that can occur when calling the storefront API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or protocol-level failure before a response was read.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body could not be decoded into the expected shape.
    #[error("response parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The endpoint requires an authenticated (or admin) session.
    #[error("authentication required")]
    AuthRequired,

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The server rejected the request with a displayable message.
    ///
    /// Carries the message verbatim so forms can show it to the user.
    #[error("{0}")]
    Rejected(String),

    /// Server fault (5xx).
    #[error("server error: HTTP {0}")]
    Server(u16),
}

impl ApiError {
    /// Whether this error should be presented as a login prompt rather
    /// than a failure notice.
    #[must_use]
    pub const fn is_auth_required(&self) -> bool {
        matches!(self, Self::AuthRequired)
    }
}

/// Extract a displayable message from an API error body.
///
/// The server is inconsistent about the key it uses: DRF validation
/// errors use `detail`, hand-written views use `error` or `message`.
/// Falls back to the raw body text when it is not JSON.
#[must_use]
pub fn extract_message(body: &str) -> Option<String> {
    if body.trim().is_empty() {
        return None;
    }

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => ["error", "detail", "message"]
            .iter()
            .find_map(|key| value.get(key).and_then(|v| v.as_str()).map(str::to_owned))
            .or_else(|| Some(value.to_string())),
        Err(_) => Some(body.trim().to_owned()),
    }
}

/// Result type alias for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_error_key() {
        assert_eq!(
            extract_message(r#"{"error": "Invalid credentials"}"#),
            Some("Invalid credentials".to_string())
        );
    }

    #[test]
    fn test_extract_detail_key() {
        assert_eq!(
            extract_message(r#"{"detail": "Cart item not found"}"#),
            Some("Cart item not found".to_string())
        );
    }

    #[test]
    fn test_extract_prefers_error_over_detail() {
        assert_eq!(
            extract_message(r#"{"detail": "secondary", "error": "primary"}"#),
            Some("primary".to_string())
        );
    }

    #[test]
    fn test_extract_non_json_body() {
        assert_eq!(
            extract_message("Bad Gateway"),
            Some("Bad Gateway".to_string())
        );
    }

    #[test]
    fn test_extract_empty_body() {
        assert_eq!(extract_message(""), None);
        assert_eq!(extract_message("  \n"), None);
    }

    #[test]
    fn test_rejected_displays_message_verbatim() {
        let err = ApiError::Rejected("Cart empty".to_string());
        assert_eq!(err.to_string(), "Cart empty");
    }

    #[test]
    fn test_is_auth_required() {
        assert!(ApiError::AuthRequired.is_auth_required());
        assert!(!ApiError::Server(500).is_auth_required());
    }
}
