//! Static fixture data standing in for the persistence tier.
//!
//! The fixtures serve three purposes: the development read fallback, the
//! mock-mode store selected at startup, and the `--seed` dataset for a fresh
//! database. They carry the same shape as persisted products so fallback
//! responses are indistinguishable from real ones.

use std::sync::RwLock;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{CreateProduct, Product, ProductQuery, SortKey, UpdateProduct};
use crate::store::ProductStore;

fn fixture(
    product_id: &str,
    name: &str,
    brand: &str,
    category: &str,
    description: &str,
    price: f64,
    launch: (i32, u32, u32),
    visits: i64,
) -> Product {
    // Fixed creation stamp so fixture ordering is stable across runs.
    const FIXTURE_CREATED_AT: i64 = 1_735_689_600; // 2025-01-01
    Product {
        id: format!("fixture-{}", product_id),
        product_id: product_id.to_string(),
        name: name.to_string(),
        brand: brand.to_string(),
        category: category.to_string(),
        description: description.to_string(),
        price,
        launch_date: NaiveDate::from_ymd_opt(launch.0, launch.1, launch.2),
        images: vec![],
        visit_count: visits,
        last_visited: None,
        created_at: FIXTURE_CREATED_AT,
        updated_at: FIXTURE_CREATED_AT,
    }
}

/// The static jewelry catalog used when the real store is unavailable.
pub fn fixture_products() -> Vec<Product> {
    vec![
        fixture(
            "WF-R-001",
            "Classic Gold Band",
            "Wafrah",
            "rings",
            "21k yellow gold band, 4mm, high polish.",
            1450.0,
            (2024, 3, 12),
            42,
        ),
        fixture(
            "WF-R-002",
            "Solitaire Zircon Ring",
            "Wafrah",
            "rings",
            "18k gold solitaire with a brilliant-cut zircon center stone.",
            2300.0,
            (2024, 9, 5),
            67,
        ),
        fixture(
            "WF-N-001",
            "Rope Chain Necklace",
            "Lazurde",
            "necklaces",
            "45cm rope chain in 18k gold.",
            3100.0,
            (2023, 11, 20),
            88,
        ),
        fixture(
            "WF-N-002",
            "Pearl Pendant",
            "Damas",
            "necklaces",
            "Freshwater pearl pendant on a fine 18k chain.",
            1890.0,
            (2025, 2, 14),
            31,
        ),
        fixture(
            "WF-B-001",
            "Bangle Trio",
            "Wafrah",
            "bracelets",
            "Set of three slim 21k bangles.",
            5400.0,
            (2024, 6, 1),
            53,
        ),
        fixture(
            "WF-E-001",
            "Teardrop Earrings",
            "Lazurde",
            "earrings",
            "18k gold teardrop earrings with pave detail.",
            980.0,
            (2024, 12, 10),
            19,
        ),
    ]
}

/// Filter and order a product slice with the same query shape the real store
/// answers, so fallback listings match what the API would have returned.
pub fn apply_query(products: &[Product], query: &ProductQuery) -> Vec<Product> {
    let mut out: Vec<Product> = products
        .iter()
        .filter(|p| {
            query
                .category
                .as_ref()
                .map_or(true, |c| p.category == *c)
        })
        .cloned()
        .collect();

    match query.sort {
        Some(SortKey::PriceAsc) => out.sort_by(|a, b| a.price.total_cmp(&b.price)),
        Some(SortKey::PriceDesc) => out.sort_by(|a, b| b.price.total_cmp(&a.price)),
        Some(SortKey::Newest) => out.sort_by(|a, b| b.launch_date.cmp(&a.launch_date)),
        Some(SortKey::Popular) => out.sort_by(|a, b| b.visit_count.cmp(&a.visit_count)),
        None => out.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }
    out
}

/// Mock listing keyed by the same criteria as the live endpoint.
pub fn get_mock_products(query: &ProductQuery) -> Vec<Product> {
    apply_query(&fixture_products(), query)
}

/// Mock detail lookup by external id.
pub fn get_mock_product_by_id(product_id: &str) -> Option<Product> {
    fixture_products()
        .into_iter()
        .find(|p| p.product_id == product_id)
}

/// In-memory store over the fixture set. Selected at startup in mock mode;
/// also handy as a test double since it honors the full store contract.
pub struct FixtureStore {
    products: RwLock<Vec<Product>>,
}

impl FixtureStore {
    /// Store seeded with the fixture catalog.
    pub fn new() -> Self {
        Self {
            products: RwLock::new(fixture_products()),
        }
    }
}

impl Default for FixtureStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductStore for FixtureStore {
    fn find_one(&self, product_id: &str) -> Result<Option<Product>> {
        let products = self.products.read().unwrap();
        Ok(products.iter().find(|p| p.product_id == product_id).cloned())
    }

    fn find_many(&self, query: &ProductQuery) -> Result<Vec<Product>> {
        let products = self.products.read().unwrap();
        Ok(apply_query(&products, query))
    }

    fn insert(&self, input: &CreateProduct) -> Result<Product> {
        let mut products = self.products.write().unwrap();
        if products.iter().any(|p| p.product_id == input.product_id) {
            return Err(AppError::Validation(format!(
                "productId '{}' already exists",
                input.product_id
            )));
        }
        let now = Utc::now().timestamp();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            product_id: input.product_id.clone(),
            name: input.name.clone(),
            brand: input.brand.clone(),
            category: input.category.clone(),
            description: input.description.clone(),
            price: input.price,
            launch_date: input.launch_date,
            images: input.images.clone(),
            visit_count: 0,
            last_visited: None,
            created_at: now,
            updated_at: now,
        };
        products.push(product.clone());
        Ok(product)
    }

    fn update(&self, product_id: &str, input: &UpdateProduct) -> Result<Option<Product>> {
        let mut products = self.products.write().unwrap();
        let Some(product) = products.iter_mut().find(|p| p.product_id == product_id) else {
            return Ok(None);
        };

        if let Some(ref name) = input.name {
            product.name = name.clone();
        }
        if let Some(ref brand) = input.brand {
            product.brand = brand.clone();
        }
        if let Some(ref category) = input.category {
            product.category = category.clone();
        }
        if let Some(ref description) = input.description {
            product.description = description.clone();
        }
        if let Some(price) = input.price {
            product.price = price;
        }
        if let Some(launch_date) = input.launch_date {
            product.launch_date = launch_date;
        }
        if let Some(ref images) = input.images {
            product.images = images.clone();
        }
        product.updated_at = Utc::now().timestamp();
        Ok(Some(product.clone()))
    }

    fn delete(&self, product_id: &str) -> Result<bool> {
        let mut products = self.products.write().unwrap();
        let before = products.len();
        products.retain(|p| p.product_id != product_id);
        Ok(products.len() < before)
    }

    fn record_visit(&self, product_id: &str, at: i64) -> Result<bool> {
        let mut products = self.products.write().unwrap();
        let Some(product) = products.iter_mut().find(|p| p.product_id == product_id) else {
            return Ok(false);
        };
        product.visit_count += 1;
        product.last_visited = Some(at);
        Ok(true)
    }
}
