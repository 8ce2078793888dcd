//! Test utilities and fixtures for Wafrah integration tests

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;

pub use wafrah::db::{init_db, queries, AppState, DbPool};
pub use wafrah::error::{AppError, Result};
pub use wafrah::handlers;
pub use wafrah::images::ImageHostClient;
pub use wafrah::mock::FixtureStore;
pub use wafrah::models::*;
pub use wafrah::store::{ProductStore, SqliteStore};

pub const ADMIN_TOKEN: &str = "test-admin-token";

/// Image host endpoint that refuses connections immediately.
pub const DEAD_IMAGE_HOST: &str = "http://127.0.0.1:1";

/// Create an in-memory test database with schema initialized
pub fn setup_test_db() -> Connection {
    let conn = Connection::open_in_memory().expect("Failed to create in-memory database");
    init_db(&conn).expect("Failed to initialize schema");
    conn
}

/// Single-connection in-memory pool so every pooled checkout sees the same
/// database.
pub fn test_pool() -> DbPool {
    let manager = SqliteConnectionManager::memory();
    let pool = Pool::builder().max_size(1).build(manager).unwrap();
    {
        let conn = pool.get().unwrap();
        init_db(&conn).unwrap();
    }
    pool
}

pub fn test_state(store: Arc<dyn ProductStore>, read_fallback: Option<Arc<FixtureStore>>) -> AppState {
    AppState {
        store,
        read_fallback,
        admin_token: Some(ADMIN_TOKEN.to_string()),
        image_host: Arc::new(ImageHostClient::new(DEAD_IMAGE_HOST, None)),
    }
}

/// App backed by an in-memory SQLite store, production configuration
/// (no read fallback).
pub fn sqlite_app() -> (Router, AppState) {
    let state = test_state(Arc::new(SqliteStore::new(test_pool())), None);
    let app = handlers::router(state.clone()).with_state(state.clone());
    (app, state)
}

/// Store whose every operation reports a storage fault. Used to exercise the
/// development read-fallback path.
pub struct FailingStore;

fn storage_fault() -> AppError {
    AppError::Database(rusqlite::Error::QueryReturnedNoRows)
}

impl ProductStore for FailingStore {
    fn find_one(&self, _product_id: &str) -> Result<Option<Product>> {
        Err(storage_fault())
    }

    fn find_many(&self, _query: &ProductQuery) -> Result<Vec<Product>> {
        Err(storage_fault())
    }

    fn insert(&self, _input: &CreateProduct) -> Result<Product> {
        Err(storage_fault())
    }

    fn update(&self, _product_id: &str, _input: &UpdateProduct) -> Result<Option<Product>> {
        Err(storage_fault())
    }

    fn delete(&self, _product_id: &str) -> Result<bool> {
        Err(storage_fault())
    }

    fn record_visit(&self, _product_id: &str, _at: i64) -> Result<bool> {
        Err(storage_fault())
    }
}

pub fn create_input(product_id: &str, name: &str, category: &str, price: f64) -> CreateProduct {
    CreateProduct {
        product_id: product_id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        brand: String::new(),
        description: String::new(),
        price,
        launch_date: None,
        images: vec![],
    }
}

/// Insert a product directly through the queries layer.
pub fn create_test_product(conn: &Connection, product_id: &str, category: &str) -> Product {
    let input = create_input(product_id, &format!("Test {}", product_id), category, 1000.0);
    queries::create_product(conn, &input).expect("Failed to create test product")
}
