//! Catalog client: products and categories.
//!
//! Public read-only endpoints. Responses are cached with `moka`
//! (5-minute TTL); the cart is deliberately NOT served from here since
//! it is mutable, per-session state. Read failures degrade to empty
//! results so product listings render as "nothing available" rather than
//! crashing the view.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, instrument, warn};

use basil_core::ProductId;

use crate::error::Result;
use crate::http::Transport;
use crate::types::{Category, Product};

/// Cache TTL for catalog responses.
const CACHE_TTL: Duration = Duration::from_secs(300);

/// Maximum number of cached entries.
const CACHE_CAPACITY: u64 = 1000;

/// Cached catalog values.
#[derive(Clone)]
enum CacheValue {
    Product(Box<Product>),
    Products(Vec<Product>),
    Categories(Vec<Category>),
}

/// Client for the product catalog.
#[derive(Clone)]
pub struct Catalog {
    inner: Arc<CatalogInner>,
}

struct CatalogInner {
    transport: Transport,
    cache: Cache<String, CacheValue>,
}

impl Catalog {
    /// Create a catalog client over a shared transport.
    #[must_use]
    pub fn new(transport: Transport) -> Self {
        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(CatalogInner { transport, cache }),
        }
    }

    /// List all products, newest first.
    ///
    /// Failures degrade to an empty list; the error is logged.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Vec<Product> {
        let cache_key = "products".to_string();

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("cache hit for products");
            return products;
        }

        match self.inner.transport.get_json::<Vec<Product>>("products/").await {
            Ok(products) => {
                self.inner
                    .cache
                    .insert(cache_key, CacheValue::Products(products.clone()))
                    .await;
                products
            }
            Err(e) => {
                warn!(error = %e, "product list fetch failed; showing empty catalog");
                Vec::new()
            }
        }
    }

    /// Get a single product by ID.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the product does not exist, or any
    /// other API failure.
    #[instrument(skip(self), fields(product = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product> {
        let cache_key = format!("product:{id}");

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("cache hit for product");
            return Ok(*product);
        }

        let product = self
            .inner
            .transport
            .get_json::<Product>(&format!("products/{id}/"))
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// List all categories.
    ///
    /// Failures degrade to an empty list; the error is logged.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Vec<Category> {
        let cache_key = "categories".to_string();

        if let Some(CacheValue::Categories(categories)) = self.inner.cache.get(&cache_key).await {
            debug!("cache hit for categories");
            return categories;
        }

        match self
            .inner
            .transport
            .get_json::<Vec<Category>>("categories/")
            .await
        {
            Ok(categories) => {
                self.inner
                    .cache
                    .insert(cache_key, CacheValue::Categories(categories.clone()))
                    .await;
                categories
            }
            Err(e) => {
                warn!(error = %e, "category list fetch failed; showing empty list");
                Vec::new()
            }
        }
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Invalidate a cached product and the product list.
    ///
    /// Called after admin catalog mutations so stale entries do not
    /// outlive an edit.
    pub async fn invalidate_product(&self, id: ProductId) {
        self.inner.cache.invalidate(&format!("product:{id}")).await;
        self.inner.cache.invalidate("products").await;
    }

    /// Invalidate all cached catalog data.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}
