//! # Product Repository
//!
//! Database operations for the catalog.
//!
//! ## Key Operations
//! - CRUD by id
//! - Filtered, paginated listing
//! - Batched lookup for checkout
//!
//! ## Listing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET /v1/product?name=tee&inStock=true&price=asc                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ProductFilter (till-core, already parsed)                             │
//! │       │                                                                 │
//! │       ▼  filter::product_listing                                       │
//! │  SELECT … WHERE LOWER(name) LIKE ? AND stock > 0                       │
//! │           ORDER BY price ASC, created_at DESC, id ASC LIMIT ? OFFSET ? │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Vec<Product>                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::filter::{self, PRODUCT_COLUMNS};
use till_core::query::ProductFilter;
use till_core::Product;

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let product = repo.get_by_id("uuid-here").await?;
/// let page = repo.list(&ProductFilter::default()).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Fetches many products in one round trip. Missing ids are skipped.
    pub async fn get_many(&self, ids: &[String]) -> DbResult<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let products = filter::products_by_ids(ids)
            .build_query_as::<Product>()
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Inserts a new product.
    ///
    /// ## Arguments
    /// * `product` - Product to insert (id generated beforehand)
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, sku = %product.sku, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, sku, category, stock, price,
                image_url, notes, is_available, location,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.sku)
        .bind(product.category)
        .bind(product.stock)
        .bind(product.price)
        .bind(&product.image_url)
        .bind(&product.notes)
        .bind(product.is_available)
        .bind(&product.location)
        .bind(product.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Overwrites every mutable field of an existing product.
    ///
    /// `created_at` is left untouched.
    ///
    /// ## Returns
    /// * `Ok(())` - Update successful
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                sku = ?3,
                category = ?4,
                stock = ?5,
                price = ?6,
                image_url = ?7,
                notes = ?8,
                is_available = ?9,
                location = ?10,
                updated_at = ?11
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.sku)
        .bind(product.category)
        .bind(product.stock)
        .bind(product.price)
        .bind(&product.image_url)
        .bind(&product.notes)
        .bind(product.is_available)
        .bind(&product.location)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Hard-deletes a product.
    ///
    /// Past transactions keep the product id inside their JSON details, so
    /// there is no foreign key to break.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Lists products matching `filter`, sorted and paginated in SQL.
    pub async fn list(&self, filter: &ProductFilter) -> DbResult<Vec<Product>> {
        let products = filter::product_listing(filter)
            .build_query_as::<Product>()
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
