//! Product catalog operations.
//!
//! Listings are cached for five minutes (capacity 1000); any catalog
//! write invalidates the whole cache so admins never act on stale reads.

use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, instrument};

use sunbird_core::ProductId;

use crate::error::ApiError;
use crate::gateway::HttpGateway;
use crate::types::{NewProduct, Page, Product, ProductPatch, ProductQuery};

const CACHE_CAPACITY: u64 = 1000;
const CACHE_TTL: Duration = Duration::from_secs(300);

/// Catalog reads and admin catalog writes.
///
/// The cache is keyed on the structured query pairs, not a joined
/// string, so a search term containing separator characters can never
/// collide with a different query.
#[derive(Clone)]
pub struct ProductsService {
    gateway: HttpGateway,
    list_cache: Cache<Vec<(&'static str, String)>, Page<Product>>,
}

impl ProductsService {
    /// Wire the service to the gateway.
    #[must_use]
    pub fn new(gateway: HttpGateway) -> Self {
        Self {
            gateway,
            list_cache: Cache::builder()
                .max_capacity(CACHE_CAPACITY)
                .time_to_live(CACHE_TTL)
                .build(),
        }
    }

    /// List products, filtered and paged per `query`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list(&self, query: &ProductQuery) -> Result<Page<Product>, ApiError> {
        let pairs = query.to_pairs();

        if let Some(page) = self.list_cache.get(&pairs).await {
            debug!("cache hit for product listing");
            return Ok(page);
        }

        let page: Page<Product> = self.gateway.get_with_query("/products", &pairs).await?;
        self.list_cache.insert(pairs, page.clone()).await;
        Ok(page)
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn create(&self, product: &NewProduct) -> Result<Product, ApiError> {
        let created = self.gateway.post("/products", product).await?;
        self.list_cache.invalidate_all();
        Ok(created)
    }

    /// Apply a partial update to a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn update(&self, id: ProductId, patch: &ProductPatch) -> Result<Product, ApiError> {
        let updated = self.gateway.put(&format!("/products/{id}"), patch).await?;
        self.list_cache.invalidate_all();
        Ok(updated)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete(&self, id: ProductId) -> Result<(), ApiError> {
        self.gateway.delete_unit(&format!("/products/{id}")).await?;
        self.list_cache.invalidate_all();
        Ok(())
    }
}
