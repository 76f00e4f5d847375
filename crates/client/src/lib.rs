//! Basil client library.
//!
//! A typed client for the Basil grocery storefront REST API: session
//! management, cart synchronization, catalog browsing, checkout, and the
//! admin back office. The server is the source of truth everywhere; this
//! crate holds only a cookie-backed session and a short-lived catalog
//! cache.
//!
//! # Example
//!
//! ```rust,ignore
//! use basil_client::{StoreClient, StoreConfig};
//! use basil_core::Credentials;
//!
//! let client = StoreClient::new(&StoreConfig::from_env()?)?;
//!
//! client.session().login(&Credentials::new("shopper42", "hunter2!")?).await?;
//!
//! let products = client.catalog().list_products().await;
//! if let Some(product) = products.first() {
//!     client.cart().add_item(product.id, 1).await?;
//! }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod http;
pub mod session;
pub mod types;

pub use cart::{AddToCart, CartSync};
pub use config::{ConfigError, StoreConfig};
pub use error::ApiError;
pub use session::{AuthError, Route, Session, SessionManager};
pub use types::*;

use crate::admin::AdminApi;
use crate::catalog::Catalog;
use crate::checkout::Checkout;
use crate::http::Transport;

/// The storefront client: every API surface over one shared transport.
///
/// All surfaces share one cookie jar, so logging in through
/// [`Self::session`] authenticates the cart, checkout, and admin
/// surfaces too. Cheap to clone.
#[derive(Clone)]
pub struct StoreClient {
    session: SessionManager,
    cart: CartSync,
    catalog: Catalog,
    checkout: Checkout,
    admin: AdminApi,
}

impl StoreClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &StoreConfig) -> error::Result<Self> {
        let transport = Transport::new(config)?;
        let catalog = Catalog::new(transport.clone());

        Ok(Self {
            session: SessionManager::new(transport.clone()),
            cart: CartSync::new(transport.clone()),
            checkout: Checkout::new(transport.clone()),
            admin: AdminApi::new(transport, catalog.clone()),
            catalog,
        })
    }

    /// Session manager (auth state, login/logout/signup).
    #[must_use]
    pub const fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Cart synchronizer.
    #[must_use]
    pub const fn cart(&self) -> &CartSync {
        &self.cart
    }

    /// Product catalog.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Checkout and order history.
    #[must_use]
    pub const fn checkout(&self) -> &Checkout {
        &self.checkout
    }

    /// Admin back office.
    #[must_use]
    pub const fn admin(&self) -> &AdminApi {
        &self.admin
    }
}
