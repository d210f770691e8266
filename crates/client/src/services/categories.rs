//! Category operations.

use std::time::Duration;

use moka::future::Cache;
use tracing::debug;

use sunbird_core::CategoryId;

use crate::error::ApiError;
use crate::gateway::HttpGateway;
use crate::types::{Category, CategoryPatch, NewCategory};

const CACHE_TTL: Duration = Duration::from_secs(300);

/// Cache key for the single category listing.
const LIST_KEY: &str = "categories";

/// Category reads and admin category writes.
#[derive(Clone)]
pub struct CategoriesService {
    gateway: HttpGateway,
    list_cache: Cache<&'static str, Vec<Category>>,
}

impl CategoriesService {
    /// Wire the service to the gateway.
    #[must_use]
    pub fn new(gateway: HttpGateway) -> Self {
        Self {
            gateway,
            list_cache: Cache::builder().max_capacity(1).time_to_live(CACHE_TTL).build(),
        }
    }

    /// List all categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list(&self) -> Result<Vec<Category>, ApiError> {
        if let Some(categories) = self.list_cache.get(&LIST_KEY).await {
            debug!("cache hit for category listing");
            return Ok(categories);
        }

        let categories: Vec<Category> = self.gateway.get("/categories").await?;
        self.list_cache.insert(LIST_KEY, categories.clone()).await;
        Ok(categories)
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn create(&self, category: &NewCategory) -> Result<Category, ApiError> {
        let created = self.gateway.post("/categories", category).await?;
        self.list_cache.invalidate_all();
        Ok(created)
    }

    /// Apply a partial update to a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn update(&self, id: CategoryId, patch: &CategoryPatch) -> Result<Category, ApiError> {
        let updated = self.gateway.put(&format!("/categories/{id}"), patch).await?;
        self.list_cache.invalidate_all();
        Ok(updated)
    }

    /// Delete a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete(&self, id: CategoryId) -> Result<(), ApiError> {
        self.gateway
            .delete_unit(&format!("/categories/{id}"))
            .await?;
        self.list_cache.invalidate_all();
        Ok(())
    }
}
