//! Catalog management.
//!
//! Ids in paths are checked for UUID shape first; a malformed id can never
//! name a product, so it is reported as not found.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiResult;
use till_core::query::ProductFilter;
use till_core::validation::{validate_product, validate_uuid};
use till_core::{CoreError, Product, ProductInput};
use till_db::{DbError, Store};

/// Server-assigned fields of a new product.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedProduct {
    pub id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn Store>,
}

impl ProductService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        ProductService { store }
    }

    pub async fn create(&self, input: ProductInput) -> ApiResult<CreatedProduct> {
        let draft = validate_product(&input)?;
        let product = Product::from_draft(Uuid::new_v4().to_string(), draft, Utc::now());

        self.store.insert_product(&product).await?;
        info!(product_id = %product.id, sku = %product.sku, "Product created");

        Ok(CreatedProduct {
            id: product.id,
            created_at: product.created_at,
        })
    }

    /// Replaces every field except `id` and `createdAt`.
    pub async fn update(&self, id: String, input: ProductInput) -> ApiResult<Product> {
        if validate_uuid(&id).is_err() {
            return Err(CoreError::ProductNotFound(id).into());
        }
        let draft = validate_product(&input)?;

        let Some(existing) = self.store.product_by_id(&id).await? else {
            return Err(CoreError::ProductNotFound(id).into());
        };

        let product = Product::from_draft(id, draft, existing.created_at);
        match self.store.update_product(&product).await {
            Ok(()) => {}
            Err(DbError::NotFound { .. }) => {
                return Err(CoreError::ProductNotFound(product.id).into());
            }
            Err(other) => return Err(other.into()),
        }

        info!(product_id = %product.id, "Product updated");
        Ok(product)
    }

    pub async fn delete(&self, id: String) -> ApiResult<()> {
        if validate_uuid(&id).is_err() {
            return Err(CoreError::ProductNotFound(id).into());
        }

        match self.store.delete_product(&id).await {
            Ok(()) => {
                info!(product_id = %id, "Product deleted");
                Ok(())
            }
            Err(DbError::NotFound { .. }) => Err(CoreError::ProductNotFound(id).into()),
            Err(other) => Err(other.into()),
        }
    }

    pub async fn list(&self, filter: &ProductFilter) -> ApiResult<Vec<Product>> {
        Ok(self.store.list_products(filter).await?)
    }
}
