//! Checkout client: addresses, order placement, and order history.
//!
//! Placing an order consumes the server-held cart; afterwards a cart
//! re-fetch (via [`crate::cart::CartSync`]) will come back empty. These
//! are write paths, so failures surface errors — business rejections
//! ("Cart empty", invalid address) carry the server's message verbatim
//! for display on the checkout form.

use serde_json::json;
use tracing::instrument;

use basil_core::AddressId;

use crate::error::Result;
use crate::http::Transport;
use crate::types::{Address, NewAddress, Order, PaymentMethod, PlacedOrder};

/// Client for checkout and order history.
#[derive(Clone)]
pub struct Checkout {
    transport: Transport,
}

impl Checkout {
    /// Create a checkout client over a shared transport.
    #[must_use]
    pub const fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// List the customer's saved addresses.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::AuthRequired` when not logged in, or any other
    /// API failure.
    #[instrument(skip(self))]
    pub async fn list_addresses(&self) -> Result<Vec<Address>> {
        self.transport.get_json("addresses/").await
    }

    /// Save a new delivery address.
    ///
    /// # Errors
    ///
    /// Validation errors surface the server's message verbatim.
    #[instrument(skip(self, address))]
    pub async fn create_address(&self, address: &NewAddress) -> Result<Address> {
        self.transport.post_json("addresses/", address).await
    }

    /// Place an order for the current cart contents.
    ///
    /// The payment collaborator is external; the client reports the
    /// chosen method and the server records paid/unpaid accordingly.
    ///
    /// # Errors
    ///
    /// Business errors ("Cart empty", unknown address) surface the
    /// server's message verbatim.
    #[instrument(skip(self), fields(address = %address, payment = %payment))]
    pub async fn place_order(
        &self,
        address: AddressId,
        payment: PaymentMethod,
    ) -> Result<PlacedOrder> {
        let body = json!({ "address_id": address, "payment": payment });
        self.transport.post_json("orders/place/", &body).await
    }

    /// List the customer's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::AuthRequired` when not logged in, or any other
    /// API failure.
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<Order>> {
        self.transport.get_json("orders/").await
    }
}
