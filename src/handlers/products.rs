use axum::extract::State;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::db::AppState;
use crate::error::{AppError, Result};
use crate::extractors::{Json, Path, Query};
use crate::models::{CreateProduct, Product, ProductQuery, SortKey, UpdateProduct};
use crate::store::ProductStore;

#[derive(Deserialize)]
pub struct ProductPath {
    pub product_id: String,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub sort: Option<String>,
    pub category: Option<String>,
}

/// Item success envelope: `{ "success": true, "data": Product }`.
#[derive(Serialize)]
pub struct ItemEnvelope {
    pub success: bool,
    pub data: Product,
}

impl ItemEnvelope {
    fn new(data: Product) -> Self {
        Self { success: true, data }
    }
}

/// Listing success envelope: `{ "success": true, "products": [Product] }`.
#[derive(Serialize)]
pub struct ListEnvelope {
    pub success: bool,
    pub products: Vec<Product>,
}

fn not_found() -> AppError {
    AppError::NotFound("Product not found".into())
}

/// Fetch one product by its external id.
///
/// The visit-count side effect is fired after the response is composed and
/// never blocks or fails the read. On a storage fault the handler serves
/// fixture data instead, but only when a read fallback was installed at
/// startup (development tier); production surfaces the fault.
pub async fn get_product(
    State(state): State<AppState>,
    Path(path): Path<ProductPath>,
) -> Result<Json<ItemEnvelope>> {
    let found = match state.store.find_one(&path.product_id) {
        Ok(found) => found,
        Err(e) if e.is_storage_fault() => {
            let Some(ref fallback) = state.read_fallback else {
                return Err(e);
            };
            tracing::warn!("Storage fault on product read, serving fixture data: {}", e);
            let product = fallback.find_one(&path.product_id)?.ok_or_else(not_found)?;
            return Ok(Json(ItemEnvelope::new(product)));
        }
        Err(e) => return Err(e),
    };

    let product = found.ok_or_else(not_found)?;

    let store = state.store.clone();
    let product_id = product.product_id.clone();
    tokio::spawn(async move {
        if let Err(e) = store.record_visit(&product_id, Utc::now().timestamp()) {
            tracing::warn!("Failed to record visit for {}: {}", product_id, e);
        }
    });

    Ok(Json(ItemEnvelope::new(product)))
}

/// List products with optional category filter and sort key. An empty result
/// is a success, never a 404.
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListEnvelope>> {
    let sort = params
        .sort
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(str::parse::<SortKey>)
        .transpose()?;

    let query = ProductQuery {
        category: params.category.filter(|c| !c.is_empty()),
        sort,
    };

    let products = state.store.find_many(&query)?;
    Ok(Json(ListEnvelope {
        success: true,
        products,
    }))
}

pub async fn create_product(
    State(state): State<AppState>,
    Json(input): Json<CreateProduct>,
) -> Result<Json<ItemEnvelope>> {
    input.validate()?;
    let product = state.store.insert(&input)?;
    Ok(Json(ItemEnvelope::new(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(path): Path<ProductPath>,
    Json(input): Json<UpdateProduct>,
) -> Result<Json<ItemEnvelope>> {
    input.validate()?;
    let product = state
        .store
        .update(&path.product_id, &input)?
        .ok_or_else(not_found)?;
    Ok(Json(ItemEnvelope::new(product)))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(path): Path<ProductPath>,
) -> Result<Json<serde_json::Value>> {
    if !state.store.delete(&path.product_id)? {
        return Err(not_found());
    }
    Ok(Json(serde_json::json!({ "success": true, "data": {} })))
}
