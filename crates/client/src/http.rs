//! HTTP transport for the storefront API.
//!
//! Wraps a [`reqwest::Client`] with a shared cookie jar. The server uses
//! cookie-based sessions and double-submit CSRF: state-changing requests
//! must echo the `csrftoken` cookie in the `X-CSRFToken` header. The jar
//! is held behind an `Arc` so the token can be read back out of it; when
//! the cookie is absent the request is still attempted without the
//! header, which the server accepts on CSRF-exempt endpoints.

use std::sync::Arc;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Method, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::config::StoreConfig;
use crate::error::{ApiError, Result, extract_message};

/// Name of the CSRF cookie set by the server.
const CSRF_COOKIE: &str = "csrftoken";

/// Header in which the CSRF token is echoed back.
const CSRF_HEADER: &str = "X-CSRFToken";

/// Shared HTTP transport.
///
/// Cheap to clone; all clones share one cookie jar, so a login performed
/// through one surface (e.g. the session manager) authenticates every
/// other surface built on the same transport.
#[derive(Clone)]
pub struct Transport {
    inner: Arc<TransportInner>,
}

struct TransportInner {
    client: reqwest::Client,
    jar: Arc<Jar>,
    base_url: url::Url,
}

impl Transport {
    /// Create a new transport from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let jar = Arc::new(Jar::default());

        let client = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(TransportInner {
                client,
                jar,
                base_url: config.base_url.clone(),
            }),
        })
    }

    /// Resolve an endpoint path against the base URL.
    ///
    /// # Panics
    ///
    /// Panics if the path is not a valid relative URL; endpoint paths are
    /// crate-internal constants, so this indicates a bug.
    fn url(&self, path: &str) -> url::Url {
        self.inner
            .base_url
            .join(path)
            .expect("endpoint path is a valid relative URL")
    }

    /// Current CSRF token, read from the cookie jar.
    fn csrf_token(&self) -> Option<String> {
        let header = self.inner.jar.cookies(&self.inner.base_url)?;
        let cookies = header.to_str().ok()?;
        cookie_value(cookies, CSRF_COOKIE).map(str::to_owned)
    }

    /// Build a request, attaching the CSRF header on state-changing verbs.
    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let state_changing = matches!(
            method,
            Method::POST | Method::PUT | Method::PATCH | Method::DELETE
        );

        let mut req = self.inner.client.request(method, self.url(path));

        if state_changing {
            if let Some(token) = self.csrf_token() {
                req = req.header(CSRF_HEADER, token);
            } else {
                // Observed fallback: attempt the call without the header
                warn!(path, "csrftoken cookie not present; sending request without CSRF header");
            }
        }

        req
    }

    /// GET a JSON resource.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.request(Method::GET, path).send().await?;
        read_json(check(response).await?).await
    }

    /// POST a JSON body and decode a JSON response.
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.request(Method::POST, path).json(body).send().await?;
        read_json(check(response).await?).await
    }

    /// POST a JSON body, ignoring the response body.
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        let response = self.request(Method::POST, path).json(body).send().await?;
        check(response).await.map(drop)
    }

    /// PUT a JSON body and decode a JSON response.
    pub async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.request(Method::PUT, path).json(body).send().await?;
        read_json(check(response).await?).await
    }

    /// PATCH a JSON body and decode a JSON response.
    pub async fn patch_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.request(Method::PATCH, path).json(body).send().await?;
        read_json(check(response).await?).await
    }

    /// DELETE a resource, ignoring the response body (usually 204).
    pub async fn delete(&self, path: &str) -> Result<()> {
        let response = self.request(Method::DELETE, path).send().await?;
        check(response).await.map(drop)
    }
}

/// Classify a non-success response into the error taxonomy.
async fn check(response: Response) -> Result<Response> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ApiError::AuthRequired),
        StatusCode::NOT_FOUND => {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::NotFound(
                extract_message(&body).unwrap_or_else(|| "resource not found".to_string()),
            ))
        }
        s if s.is_client_error() => {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::Rejected(extract_message(&body).unwrap_or_else(
                || format!("request rejected: HTTP {s}"),
            )))
        }
        s => Err(ApiError::Server(s.as_u16())),
    }
}

/// Decode a JSON body, logging a body excerpt on parse failure.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let text = response.text().await?;

    serde_json::from_str(&text).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %text.chars().take(500).collect::<String>(),
            "failed to parse API response"
        );
        ApiError::Parse(e)
    })
}

/// Find a cookie's value in a `Cookie:`-style header string.
fn cookie_value<'a>(cookies: &'a str, name: &str) -> Option<&'a str> {
    cookies.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then_some(value)
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_value_found() {
        let cookies = "sessionid=abc123; csrftoken=tok456";
        assert_eq!(cookie_value(cookies, "csrftoken"), Some("tok456"));
        assert_eq!(cookie_value(cookies, "sessionid"), Some("abc123"));
    }

    #[test]
    fn test_cookie_value_absent() {
        assert_eq!(cookie_value("sessionid=abc123", "csrftoken"), None);
        assert_eq!(cookie_value("", "csrftoken"), None);
    }

    #[test]
    fn test_cookie_value_no_partial_name_match() {
        assert_eq!(cookie_value("xcsrftoken=nope", "csrftoken"), None);
    }

    #[test]
    fn test_cookie_value_keeps_equals_in_value() {
        assert_eq!(cookie_value("csrftoken=a=b", "csrftoken"), Some("a=b"));
    }
}
