//! Product store strategy.
//!
//! The storage tier is selected once at startup: `SqliteStore` for the real
//! database, `FixtureStore` (see [`crate::mock`]) when mock mode is enabled.
//! Handlers only ever see the trait, so the fallback policy is an explicit
//! strategy choice rather than a per-call environment check.

use crate::db::{queries, DbPool};
use crate::error::Result;
use crate::models::{CreateProduct, Product, ProductQuery, UpdateProduct};

/// Persistence contract for the product collection.
///
/// Reads are idempotent under retry. `delete` of an absent id reports
/// not-found (`Ok(false)`), never an error.
pub trait ProductStore: Send + Sync {
    /// Find at most one product by its external id.
    fn find_one(&self, product_id: &str) -> Result<Option<Product>>;

    /// Find products matching the filter/sort criteria. An empty result is
    /// success, never a fault.
    fn find_many(&self, query: &ProductQuery) -> Result<Vec<Product>>;

    /// Persist a new product. Rejects a `product_id` collision.
    fn insert(&self, input: &CreateProduct) -> Result<Product>;

    /// Apply a partial update; returns the merged state or None if absent.
    fn update(&self, product_id: &str, input: &UpdateProduct) -> Result<Option<Product>>;

    /// Remove by id; Ok(false) if absent.
    fn delete(&self, product_id: &str) -> Result<bool>;

    /// Increment the visit counter and stamp the read time.
    fn record_visit(&self, product_id: &str, at: i64) -> Result<bool>;
}

/// SQLite-backed store over a pooled connection.
pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl ProductStore for SqliteStore {
    fn find_one(&self, product_id: &str) -> Result<Option<Product>> {
        let conn = self.pool.get()?;
        queries::get_product(&conn, product_id)
    }

    fn find_many(&self, query: &ProductQuery) -> Result<Vec<Product>> {
        let conn = self.pool.get()?;
        queries::list_products(&conn, query)
    }

    fn insert(&self, input: &CreateProduct) -> Result<Product> {
        let conn = self.pool.get()?;
        queries::create_product(&conn, input)
    }

    fn update(&self, product_id: &str, input: &UpdateProduct) -> Result<Option<Product>> {
        let conn = self.pool.get()?;
        queries::update_product(&conn, product_id, input)
    }

    fn delete(&self, product_id: &str) -> Result<bool> {
        let conn = self.pool.get()?;
        queries::delete_product(&conn, product_id)
    }

    fn record_visit(&self, product_id: &str, at: i64) -> Result<bool> {
        let conn = self.pool.get()?;
        queries::record_visit(&conn, product_id, at)
    }
}
