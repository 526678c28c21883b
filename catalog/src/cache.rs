/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use super::error::CatalogError;
use super::normalize::{
    image_urls, in_category, normalize_categories, normalize_product, normalize_products,
};
use super::types::*;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, warn};

pub const PRODUCT_OBJECT_TYPES: &str = "ITEM,ITEM_VARIATION,IMAGE";
pub const CATEGORY_OBJECT_TYPES: &str = "CATEGORY";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Every object of the given comma-separated types, across all pages.
    async fn list_objects(&self, types: &str) -> Result<Vec<CatalogObject>, CatalogError>;
    async fn retrieve_objects(
        &self,
        ids: Vec<String>,
    ) -> Result<BatchRetrieveResponse, CatalogError>;
    async fn create_order(&self, order: NewOrder) -> Result<CreatedOrder, CatalogError>;
}

struct CachedProducts {
    fetched_at: Instant,
    products: Arc<Vec<Product>>,
}

/// Product list cache in front of a [`CatalogSource`].
///
/// Concurrent misses are not coalesced; each one fetches upstream and the
/// last writer wins.
pub struct Catalog {
    source: Arc<dyn CatalogSource>,
    ttl: Duration,
    products: RwLock<Option<CachedProducts>>,
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl Catalog {
    pub fn new(source: Arc<dyn CatalogSource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            products: RwLock::new(None),
        }
    }

    pub async fn products(&self) -> Result<Arc<Vec<Product>>, CatalogError> {
        if let Some(cached) = self.products.read().await.as_ref() {
            if cached.fetched_at.elapsed() < self.ttl {
                return Ok(Arc::clone(&cached.products));
            }
        }

        match self.source.list_objects(PRODUCT_OBJECT_TYPES).await {
            Ok(objects) => {
                let products = Arc::new(normalize_products(&objects));
                debug!(count = products.len(), "Refreshed catalog products");

                *self.products.write().await = Some(CachedProducts {
                    fetched_at: Instant::now(),
                    products: Arc::clone(&products),
                });

                Ok(products)
            }
            Err(e) => {
                warn!(error = %e, "Catalog fetch failed, clearing product cache");
                self.invalidate().await;
                Err(e)
            }
        }
    }

    pub async fn invalidate(&self) {
        *self.products.write().await = None;
    }

    pub async fn product(&self, id: &str) -> Result<Option<Product>, CatalogError> {
        let response = self.source.retrieve_objects(vec![id.to_string()]).await?;

        let Some(object) = response.objects.first() else {
            return Ok(None);
        };

        Ok(normalize_product(object, &image_urls(&response.related_objects)))
    }

    pub async fn categories(&self) -> Result<Vec<CatalogCategory>, CatalogError> {
        let objects = self.source.list_objects(CATEGORY_OBJECT_TYPES).await?;
        Ok(normalize_categories(&objects))
    }

    pub async fn products_in_category(
        &self,
        category_id: &str,
    ) -> Result<Vec<Product>, CatalogError> {
        let products = self.products().await?;

        let filtered: Vec<Product> = products
            .iter()
            .filter(|product| in_category(product, category_id))
            .cloned()
            .collect();

        if filtered.is_empty() {
            debug!(
                category_id,
                total = products.len(),
                "No catalog products matched category"
            );
        }

        Ok(filtered)
    }

    /// Number of ITEM objects, used as a connectivity check.
    pub async fn item_count(&self) -> Result<usize, CatalogError> {
        Ok(self.source.list_objects("ITEM").await?.len())
    }

    pub async fn create_order(&self, order: NewOrder) -> Result<CreatedOrder, CatalogError> {
        self.source.create_order(order).await
    }
}
