mod from_row;
mod schema;

pub mod queries;

pub use from_row::{query_all, query_one, FromRow, PRODUCT_COLS};
pub use schema::init_db;

use std::sync::Arc;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::images::ImageHostClient;
use crate::mock::FixtureStore;
use crate::store::ProductStore;

pub type DbPool = Pool<SqliteConnectionManager>;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Product store strategy, selected once at startup (SQLite or fixtures).
    pub store: Arc<dyn ProductStore>,
    /// Fixture fallback consulted on storage faults during reads.
    /// Populated only in development configuration.
    pub read_fallback: Option<Arc<FixtureStore>>,
    /// Admin bearer token for mutating routes. None disables mutations entirely.
    pub admin_token: Option<String>,
    pub image_host: Arc<ImageHostClient>,
}

pub fn create_pool(database_path: &str) -> Result<DbPool, r2d2::Error> {
    let manager = SqliteConnectionManager::file(database_path);
    Pool::builder().max_size(10).build(manager)
}
