//! Back-office client: product CRUD, order management, customers, and
//! the sales report.
//!
//! Every endpoint here requires an admin session; the server answers
//! 401/403 otherwise, which surfaces as `ApiError::AuthRequired`.
//! Catalog mutations invalidate the shared catalog cache so the public
//! listing never serves a stale product past an edit.

use serde::Deserialize;
use tracing::instrument;

use basil_core::{CustomerId, OrderId, ProductId};

use crate::catalog::Catalog;
use crate::error::Result;
use crate::http::Transport;
use crate::types::{Customer, Order, OrderUpdate, Product, ProductInput, SalesReportRow};

/// Client for the admin back office.
#[derive(Clone)]
pub struct AdminApi {
    transport: Transport,
    catalog: Catalog,
}

impl AdminApi {
    /// Create an admin client sharing the transport and catalog cache.
    #[must_use]
    pub const fn new(transport: Transport, catalog: Catalog) -> Self {
        Self { transport, catalog }
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Validation errors surface the server's message verbatim.
    #[instrument(skip(self, product), fields(name = %product.name))]
    pub async fn create_product(&self, product: &ProductInput) -> Result<Product> {
        let created: Product = self.transport.post_json("admin/products/", product).await?;
        self.catalog.invalidate_product(created.id).await;
        Ok(created)
    }

    /// Replace a product's fields.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for an unknown product; validation
    /// errors surface the server's message verbatim.
    #[instrument(skip(self, product), fields(product = %id))]
    pub async fn update_product(&self, id: ProductId, product: &ProductInput) -> Result<Product> {
        let updated: Product = self
            .transport
            .put_json(&format!("admin/products/{id}/"), product)
            .await?;
        self.catalog.invalidate_product(id).await;
        Ok(updated)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for an unknown product.
    #[instrument(skip(self), fields(product = %id))]
    pub async fn delete_product(&self, id: ProductId) -> Result<()> {
        self.transport
            .delete(&format!("admin/products/{id}/"))
            .await?;
        self.catalog.invalidate_product(id).await;
        Ok(())
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// List all orders across customers, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::AuthRequired` without an admin session.
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<Order>> {
        self.transport.get_json("admin/orders/").await
    }

    /// Update an order's fulfillment and payment status.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for an unknown order.
    #[instrument(skip(self, update), fields(order = %id))]
    pub async fn update_order(&self, id: OrderId, update: &OrderUpdate) -> Result<()> {
        // Response body is {"success": true}; nothing useful to return
        self.transport
            .put_json::<_, serde_json::Value>(&format!("admin/orders/{id}/"), update)
            .await
            .map(drop)
    }

    // =========================================================================
    // Customers
    // =========================================================================

    /// List all customer accounts.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::AuthRequired` without an admin session.
    #[instrument(skip(self))]
    pub async fn list_customers(&self) -> Result<Vec<Customer>> {
        self.transport.get_json("admin/customers/").await
    }

    /// Activate or deactivate a customer account.
    ///
    /// Returns the account's active flag as confirmed by the server.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for an unknown customer.
    #[instrument(skip(self), fields(customer = %id, active))]
    pub async fn set_customer_active(&self, id: CustomerId, active: bool) -> Result<bool> {
        #[derive(Deserialize)]
        struct Response {
            is_active: bool,
        }

        let body = serde_json::json!({ "is_active": active });
        let response: Response = self
            .transport
            .put_json(&format!("admin/customers/{id}/"), &body)
            .await?;

        Ok(response.is_active)
    }

    // =========================================================================
    // Reports
    // =========================================================================

    /// Per-product sales report, ordered by units sold.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::AuthRequired` without an admin session.
    #[instrument(skip(self))]
    pub async fn sales_report(&self) -> Result<Vec<SalesReportRow>> {
        self.transport.get_json("admin/reports/sales/").await
    }
}
