//! Session manager: authentication and authorization state.
//!
//! Owns the client's view of "who is logged in" for the lifetime of the
//! process. The state is rebuilt from the server on demand and after
//! every auth-mutating action; it is never trusted to outlive one of
//! those actions. All view-level decisions (what is renderable, which
//! routes exist) derive from the current [`Session`] snapshot.

use std::sync::Arc;

use secrecy::ExposeSecret;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{instrument, warn};

use basil_core::{Credentials, SignupDetails};

use crate::error::ApiError;
use crate::http::Transport;

/// Errors surfaced by login and signup.
///
/// `refresh_auth` and `logout` never fail: any collaborator failure
/// degrades to a logged-out session instead.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Wrong username or password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The server rejected the request with a displayable message
    /// (e.g. "Username taken").
    #[error("{0}")]
    Rejected(String),

    /// Any other API failure.
    #[error(transparent)]
    Api(ApiError),
}

/// Client-side authentication state.
///
/// Invariant: `is_admin` implies `authenticated`. The constructor
/// coerces, so an admin flag on an unauthenticated response can never
/// produce an inconsistent session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Session {
    authenticated: bool,
    is_admin: bool,
}

impl Session {
    /// Build a session, upholding the `is_admin ⇒ authenticated` invariant.
    #[must_use]
    pub const fn new(authenticated: bool, is_admin: bool) -> Self {
        Self {
            authenticated,
            is_admin: is_admin && authenticated,
        }
    }

    /// The logged-out session.
    #[must_use]
    pub const fn logged_out() -> Self {
        Self {
            authenticated: false,
            is_admin: false,
        }
    }

    /// Whether the current user is authenticated.
    #[must_use]
    pub const fn authenticated(&self) -> bool {
        self.authenticated
    }

    /// Whether the current user holds administrative privileges.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.is_admin
    }
}

/// Views the client can navigate to.
///
/// Availability is derived solely from the current [`Session`]; a view
/// whose predicate is false is unreachable, not merely hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Products,
    ProductDetail,
    Cart,
    Checkout,
    /// Customer order history. Admin accounts use the back-office order
    /// views instead; the two are mutually exclusive.
    Orders,
    Login,
    Signup,
    AdminProducts,
    AdminOrders,
    AdminCustomers,
    AdminReports,
}

impl Route {
    /// Whether this route is reachable under the given session.
    #[must_use]
    pub const fn is_reachable(self, session: &Session) -> bool {
        match self {
            Self::Products | Self::ProductDetail | Self::Login | Self::Signup => true,
            Self::Cart | Self::Checkout => session.authenticated(),
            Self::Orders => session.authenticated() && !session.is_admin(),
            Self::AdminProducts | Self::AdminOrders | Self::AdminCustomers | Self::AdminReports => {
                session.is_admin()
            }
        }
    }
}

/// Wire shape of the auth-check endpoint.
///
/// `is_admin` is omitted entirely for anonymous sessions.
#[derive(Debug, Deserialize)]
struct CheckAuthResponse {
    authenticated: bool,
    #[serde(default)]
    is_admin: bool,
}

/// Manages the authentication session against the storefront API.
///
/// Cheap to clone; clones share both the transport (and therefore the
/// session cookie) and the cached [`Session`] snapshot.
#[derive(Clone)]
pub struct SessionManager {
    transport: Transport,
    state: Arc<RwLock<Session>>,
}

impl SessionManager {
    /// Create a session manager over a shared transport.
    ///
    /// Starts logged out; call [`Self::refresh_auth`] to pick up an
    /// existing server-side session.
    #[must_use]
    pub fn new(transport: Transport) -> Self {
        Self {
            transport,
            state: Arc::new(RwLock::new(Session::logged_out())),
        }
    }

    /// Snapshot of the current session.
    pub async fn current(&self) -> Session {
        *self.state.read().await
    }

    /// Re-check authentication state with the server.
    ///
    /// Any failure (transport, non-2xx, parse) degrades to a logged-out
    /// session; this method never reports an error.
    #[instrument(skip(self))]
    pub async fn refresh_auth(&self) -> Session {
        let session = match self
            .transport
            .get_json::<CheckAuthResponse>("check-auth/")
            .await
        {
            Ok(body) => Session::new(body.authenticated, body.is_admin),
            Err(e) => {
                warn!(error = %e, "auth check failed; treating session as logged out");
                Session::logged_out()
            }
        };

        *self.state.write().await = session;
        session
    }

    /// Log in with username and password.
    ///
    /// On success the session cookie is stored in the shared jar and the
    /// session is re-fetched from the server before returning; the login
    /// response body alone is not trusted as session truth.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` on a 401, a verbatim
    /// server message on other rejections, or the underlying `ApiError`.
    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let body = serde_json::json!({
            "username": credentials.username,
            "password": credentials.password.expose_secret(),
        });

        self.transport
            .post("login/", &body)
            .await
            .map_err(|e| match e {
                ApiError::AuthRequired => AuthError::InvalidCredentials,
                ApiError::Rejected(message) => AuthError::Rejected(message),
                other => AuthError::Api(other),
            })?;

        Ok(self.refresh_auth().await)
    }

    /// Create an account and log in.
    ///
    /// The server logs the new user in as part of signup; the session is
    /// still re-fetched before reporting success.
    ///
    /// # Errors
    ///
    /// Returns the server's rejection message verbatim (e.g. "Username
    /// taken"), or the underlying `ApiError`.
    #[instrument(skip(self, details), fields(username = %details.username))]
    pub async fn signup(&self, details: &SignupDetails) -> Result<Session, AuthError> {
        let body = serde_json::json!({
            "username": details.username,
            "password": details.password.expose_secret(),
            "confirmPassword": details.password.expose_secret(),
        });

        self.transport
            .post("signup/", &body)
            .await
            .map_err(|e| match e {
                ApiError::Rejected(message) => AuthError::Rejected(message),
                ApiError::AuthRequired => AuthError::InvalidCredentials,
                other => AuthError::Api(other),
            })?;

        Ok(self.refresh_auth().await)
    }

    /// Log out.
    ///
    /// The session is reset to logged out unconditionally, whatever the
    /// collaborator answers (or whether it is reachable at all).
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Session {
        if let Err(e) = self.transport.post("logout/", &serde_json::json!({})).await {
            warn!(error = %e, "logout request failed; clearing local session anyway");
        }

        let session = Session::logged_out();
        *self.state.write().await = session;
        session
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_implies_authenticated() {
        // A malformed server response cannot produce an inconsistent session
        let session = Session::new(false, true);
        assert!(!session.authenticated());
        assert!(!session.is_admin());

        let session = Session::new(true, true);
        assert!(session.authenticated());
        assert!(session.is_admin());
    }

    #[test]
    fn test_check_auth_response_anonymous_shape() {
        // The server omits is_admin for anonymous sessions
        let body: CheckAuthResponse = serde_json::from_str(r#"{"authenticated": false}"#).unwrap();
        assert!(!body.authenticated);
        assert!(!body.is_admin);
    }

    #[test]
    fn test_check_auth_response_full_shape() {
        let body: CheckAuthResponse = serde_json::from_str(
            r#"{"authenticated": true, "username": "shopper42", "is_admin": true}"#,
        )
        .unwrap();
        assert!(body.authenticated);
        assert!(body.is_admin);
    }

    #[test]
    fn test_public_routes_always_reachable() {
        let anonymous = Session::logged_out();
        for route in [Route::Products, Route::ProductDetail, Route::Login, Route::Signup] {
            assert!(route.is_reachable(&anonymous));
        }
    }

    #[test]
    fn test_customer_routes_require_authentication() {
        let anonymous = Session::logged_out();
        let customer = Session::new(true, false);

        for route in [Route::Cart, Route::Checkout, Route::Orders] {
            assert!(!route.is_reachable(&anonymous));
            assert!(route.is_reachable(&customer));
        }
    }

    #[test]
    fn test_admin_routes_require_admin() {
        let customer = Session::new(true, false);
        let admin = Session::new(true, true);

        for route in [
            Route::AdminProducts,
            Route::AdminOrders,
            Route::AdminCustomers,
            Route::AdminReports,
        ] {
            assert!(!route.is_reachable(&customer));
            assert!(route.is_reachable(&admin));
        }
    }

    #[test]
    fn test_orders_route_excluded_for_admins() {
        // Customer order history and the back office are mutually exclusive
        let admin = Session::new(true, true);
        assert!(!Route::Orders.is_reachable(&admin));
    }
}
