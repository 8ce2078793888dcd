pub mod products;
pub mod upload;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::db::AppState;
use crate::extractors::Json;

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Build the API router. Catalog reads are public; mutations and the upload
/// proxy require the admin token.
pub fn router(state: AppState) -> Router<AppState> {
    let admin_gate =
        axum::middleware::from_fn_with_state(state, crate::middleware::require_admin);

    Router::new()
        .route("/health", get(health))
        .route("/products", get(products::list_products))
        .route("/products/{product_id}", get(products::get_product))
        .merge(
            Router::new()
                .route("/products", post(products::create_product))
                .route(
                    "/products/{product_id}",
                    put(products::update_product).delete(products::delete_product),
                )
                .route("/upload", post(upload::upload_images))
                .route_layer(admin_gate),
        )
}
