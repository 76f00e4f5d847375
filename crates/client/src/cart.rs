//! Cart synchronizer.
//!
//! The server owns the cart; this module owns keeping the client's view
//! of it honest. Every mutation is followed by a full re-fetch, so the
//! returned cart always reflects state the server has acknowledged —
//! nothing is patched in place and no quantity or total is computed
//! client-side beyond display. Overlapping mutations on the same item
//! are not coordinated: the server's last write wins.

use serde_json::json;
use tracing::{debug, instrument, warn};

use basil_core::{CartItemId, ProductId};

use crate::error::{ApiError, Result};
use crate::http::Transport;
use crate::types::CartItem;

/// Outcome of an add-to-cart attempt.
///
/// Unauthorized adds are a routine flow, not a failure: callers branch on
/// [`Self::LoginRequired`] to show a login prompt instead of an error.
#[derive(Debug)]
pub enum AddToCart {
    /// The item was added; carries the re-fetched authoritative cart.
    Added(Vec<CartItem>),
    /// The user must log in before adding to the cart.
    LoginRequired,
}

/// Synchronizes the server-held shopping cart.
#[derive(Clone)]
pub struct CartSync {
    transport: Transport,
}

impl CartSync {
    /// Create a cart synchronizer over a shared transport.
    #[must_use]
    pub const fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Fetch the current authoritative cart.
    ///
    /// Any failure degrades to an empty cart so rendering code never has
    /// to handle a cart error; the failure is logged instead.
    #[instrument(skip(self))]
    pub async fn fetch_cart(&self) -> Vec<CartItem> {
        match self.transport.get_json::<Vec<CartItem>>("cart/").await {
            Ok(items) => items,
            Err(e) => {
                warn!(error = %e, "cart fetch failed; showing empty cart");
                Vec::new()
            }
        }
    }

    /// Add a product to the cart.
    ///
    /// Adding a product already in the cart increments its quantity
    /// server-side. On success the full cart is re-fetched and returned.
    ///
    /// # Errors
    ///
    /// An unauthorized response is NOT an error (see [`AddToCart`]); any
    /// other non-success response is.
    #[instrument(skip(self), fields(product = %product, quantity))]
    pub async fn add_item(&self, product: ProductId, quantity: u32) -> Result<AddToCart> {
        let body = json!({ "product_id": product, "quantity": quantity });

        match self.transport.post_json::<_, CartItem>("cart/", &body).await {
            Ok(_created) => Ok(AddToCart::Added(self.fetch_cart().await)),
            Err(ApiError::AuthRequired) => Ok(AddToCart::LoginRequired),
            Err(other) => Err(other),
        }
    }

    /// Set the quantity of a cart line.
    ///
    /// A quantity of zero or less removes the line; no update with a
    /// non-positive quantity is ever issued. On success the full cart is
    /// re-fetched and returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the update is rejected or fails.
    #[instrument(skip(self), fields(item = %item, quantity))]
    pub async fn update_quantity(&self, item: CartItemId, quantity: i64) -> Result<Vec<CartItem>> {
        if quantity <= 0 {
            return self.remove_item(item).await;
        }

        let path = format!("cart/{item}/");
        self.transport
            .patch_json::<_, CartItem>(&path, &json!({ "quantity": quantity }))
            .await?;

        Ok(self.fetch_cart().await)
    }

    /// Remove a line from the cart.
    ///
    /// Idempotent from the caller's perspective: removing a line that is
    /// already gone counts as success. On success the full cart is
    /// re-fetched and returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the removal fails for any reason other than
    /// the line already being absent.
    #[instrument(skip(self), fields(item = %item))]
    pub async fn remove_item(&self, item: CartItemId) -> Result<Vec<CartItem>> {
        match self.transport.delete(&format!("cart/{item}/")).await {
            Ok(()) => {}
            Err(ApiError::NotFound(_)) => {
                debug!("cart item already absent");
            }
            Err(other) => return Err(other),
        }

        Ok(self.fetch_cart().await)
    }
}
