//! Wire types for the storefront API.
//!
//! Every response shape is an explicit struct parsed on receipt; nothing
//! downstream touches raw JSON. Field names follow the server's
//! serializers, with serde renames where the wire name is awkward.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use basil_core::{
    AddressId, CartItemId, CategoryId, CustomerId, OrderId, OrderItemId, OrderStatus,
    PaymentStatus, Price, ProductId,
};

// =============================================================================
// Catalog
// =============================================================================

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub description: String,
    /// Category foreign key; `None` for uncategorized products.
    #[serde(default)]
    pub category: Option<CategoryId>,
    /// Denormalized category name, provided read-only by the server.
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload for creating or replacing a product (admin).
#[derive(Debug, Clone, Serialize)]
pub struct ProductInput {
    pub name: String,
    pub price: Price,
    pub stock: i32,
    pub description: String,
    pub category: Option<CategoryId>,
    pub image_url: Option<String>,
}

// =============================================================================
// Cart
// =============================================================================

/// A line in the server-held cart.
///
/// The client never computes or caches totals: [`Self::line_total`]
/// recomputes from the embedded product price at call time, and the whole
/// cart is replaced after every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub product: Product,
    pub quantity: u32,
    #[serde(default)]
    pub added_at: Option<DateTime<Utc>>,
}

impl CartItem {
    /// Displayed line total: unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// Subtotal across a cart snapshot.
#[must_use]
pub fn cart_subtotal(items: &[CartItem]) -> Price {
    items.iter().map(CartItem::line_total).sum()
}

// =============================================================================
// Checkout
// =============================================================================

/// A saved delivery address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: AddressId,
    pub line1: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub phone: String,
}

/// Payload for creating a delivery address.
#[derive(Debug, Clone, Serialize)]
pub struct NewAddress {
    pub line1: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub phone: String,
}

/// Payment method chosen at checkout.
///
/// The payment collaborator itself is external; the client only reports
/// which method the customer picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Cash on delivery.
    #[default]
    Cod,
    Paypal,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Cod => "cod",
            Self::Paypal => "paypal",
        })
    }
}

/// Acknowledgement returned when an order is placed.
#[derive(Debug, Clone, Deserialize)]
pub struct PlacedOrder {
    pub message: String,
    pub order_id: OrderId,
}

// =============================================================================
// Orders
// =============================================================================

/// The customer an order belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderUser {
    pub id: CustomerId,
    pub username: String,
}

/// A line on a placed order, with the price captured at purchase time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    /// Product reference; `None` when the product was since deleted.
    #[serde(default)]
    pub product: Option<ProductId>,
    pub product_name: String,
    pub unit_price: Price,
    pub quantity: u32,
    pub subtotal: Price,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user: OrderUser,
    pub address: Address,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub total_amount: Price,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for the admin order update endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct OrderUpdate {
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
}

// =============================================================================
// Admin
// =============================================================================

/// A customer account as listed in the back office.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub username: String,
    pub is_active: bool,
    pub is_staff: bool,
}

/// One row of the per-product sales report.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SalesReportRow {
    /// Product ID; the server emits the ORM's joined column name.
    #[serde(rename = "product__id")]
    pub product_id: ProductId,
    pub product_name: String,
    pub total_quantity: i64,
    pub total_revenue: Price,
}
