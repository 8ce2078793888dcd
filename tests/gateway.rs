//! Client data gateway tests: mock-mode reads, fault fallback, write
//! propagation, and a live round trip against a served app.

mod common;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use common::*;
use serde_json::json;
use wafrah::gateway::{GatewayError, GatewayOptions, ProductGateway};
use wafrah::images::UploadFile;

/// Nothing listens here; connections are refused immediately.
const DEAD_API: &str = "http://127.0.0.1:1";

fn dead_gateway(fallback_on_fault: bool) -> ProductGateway {
    ProductGateway::new(GatewayOptions {
        base_url: Some(DEAD_API.to_string()),
        admin_token: Some(ADMIN_TOKEN.to_string()),
        use_mock_data: false,
        fallback_on_fault,
    })
}

// ============ Mock mode ============

#[tokio::test]
async fn test_mock_mode_serves_fixtures_without_network() {
    let gateway = ProductGateway::new(GatewayOptions {
        base_url: Some(DEAD_API.to_string()),
        use_mock_data: true,
        ..Default::default()
    });

    let query = ProductQuery {
        category: Some("rings".into()),
        sort: None,
    };
    let products = gateway.get_products(&query).await.unwrap();
    assert!(!products.is_empty());
    assert!(products.iter().all(|p| p.category == "rings"));

    let product = gateway.get_product_by_id("WF-N-001").await.unwrap();
    assert_eq!(product.unwrap().name, "Rope Chain Necklace");
}

// ============ Read fallback ============

#[tokio::test]
async fn test_read_fault_falls_back_to_fixtures() {
    let gateway = dead_gateway(true);

    let products = gateway.get_products(&ProductQuery::default()).await.unwrap();
    assert!(!products.is_empty());

    let product = gateway.get_product_by_id("WF-R-001").await.unwrap();
    assert!(product.is_some());
}

#[tokio::test]
async fn test_read_fault_without_fallback_propagates() {
    let gateway = dead_gateway(false);

    let err = gateway
        .get_products(&ProductQuery::default())
        .await
        .expect_err("Read should fail without fallback");
    assert!(matches!(err, GatewayError::Transport(_)));
}

// ============ Write propagation ============

#[tokio::test]
async fn test_write_faults_are_never_masked() {
    // Fallback enabled, but writes must still surface the failure.
    let gateway = dead_gateway(true);

    let err = gateway
        .create_product(&create_input("P1", "Gold Ring", "rings", 15000.0))
        .await
        .expect_err("Create should fail");
    assert!(matches!(err, GatewayError::Transport(_)));
    assert!(!err.to_string().is_empty());

    let err = gateway
        .delete_product("P1")
        .await
        .expect_err("Delete should fail");
    assert!(matches!(err, GatewayError::Transport(_)));

    let err = gateway
        .update_product("P1", &json!({ "price": 999 }))
        .await
        .expect_err("Update should fail");
    assert!(matches!(err, GatewayError::Transport(_)));
}

#[tokio::test]
async fn test_saga_with_no_staged_images_propagates_create_error() {
    let gateway = dead_gateway(true);

    let err = gateway
        .create_product_with_images(vec![], create_input("P1", "Gold Ring", "rings", 15000.0))
        .await
        .expect_err("Saga should surface the create failure");
    assert!(matches!(err, GatewayError::Transport(_)));
}

// ============ Live round trip ============

async fn serve_state(state: AppState) -> String {
    let app = handlers::router(state.clone()).with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn serve_app() -> String {
    serve_state(test_state(Arc::new(SqliteStore::new(test_pool())), None)).await
}

#[tokio::test]
async fn test_gateway_end_to_end_crud() {
    let base_url = serve_app().await;
    let gateway = ProductGateway::new(GatewayOptions {
        base_url: Some(base_url),
        admin_token: Some(ADMIN_TOKEN.to_string()),
        ..Default::default()
    });

    // Create and read back.
    let created = gateway
        .create_product(&create_input("P1", "Gold Ring", "rings", 15000.0))
        .await
        .unwrap();
    assert_eq!(created.product_id, "P1");

    let fetched = gateway.get_product_by_id("P1").await.unwrap().unwrap();
    assert_eq!(fetched.name, "Gold Ring");

    // Listing matches the query shape.
    let query = ProductQuery {
        category: Some("rings".into()),
        sort: None,
    };
    let products = gateway.get_products(&query).await.unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].product_id, "P1");

    // Partial update through the gateway.
    let updated = gateway
        .update_product("P1", &json!({ "price": 999 }))
        .await
        .unwrap();
    assert_eq!(updated.price, 999.0);
    assert_eq!(updated.name, "Gold Ring");

    // Delete, then the detail read resolves to None.
    gateway.delete_product("P1").await.unwrap();
    assert!(gateway.get_product_by_id("P1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_gateway_surfaces_api_validation_message() {
    let base_url = serve_app().await;
    let gateway = ProductGateway::new(GatewayOptions {
        base_url: Some(base_url),
        admin_token: Some(ADMIN_TOKEN.to_string()),
        ..Default::default()
    });

    gateway
        .create_product(&create_input("P1", "Gold Ring", "rings", 15000.0))
        .await
        .unwrap();

    let err = gateway
        .create_product(&create_input("P1", "Duplicate", "rings", 1.0))
        .await
        .expect_err("Duplicate create should fail");
    match err {
        GatewayError::Api { status, message } => {
            assert_eq!(status, 400);
            assert!(message.contains("P1"), "message should name the id: {}", message);
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_gateway_write_without_token_is_unauthorized() {
    let base_url = serve_app().await;
    let gateway = ProductGateway::new(GatewayOptions {
        base_url: Some(base_url),
        admin_token: None,
        ..Default::default()
    });

    let err = gateway
        .create_product(&create_input("P1", "Gold Ring", "rings", 15000.0))
        .await
        .expect_err("Unauthenticated write should fail");
    assert!(matches!(err, GatewayError::Api { status: 401, .. }));
}

// ============ Saga cleanup ============

/// Records every upload and delete the stub image host receives.
#[derive(Clone, Default)]
struct ImageHostLog {
    uploads: Arc<Mutex<Vec<String>>>,
    deletes: Arc<Mutex<Vec<String>>>,
}

/// A local image host that hands out sequential URLs and records deletions.
async fn stub_image_host() -> (String, ImageHostLog) {
    let log = ImageHostLog::default();

    let uploads = log.uploads.clone();
    let deletes = log.deletes.clone();
    let app = axum::Router::new().route(
        "/v1/images",
        axum::routing::post(move || {
            let uploads = uploads.clone();
            async move {
                let url = {
                    let mut uploads = uploads.lock().unwrap();
                    let url = format!("https://img.test/{}.jpg", uploads.len() + 1);
                    uploads.push(url.clone());
                    url
                };
                axum::Json(json!({ "url": url }))
            }
        })
        .delete(
            move |axum::extract::Query(params): axum::extract::Query<HashMap<String, String>>| {
                let deletes = deletes.clone();
                async move {
                    if let Some(url) = params.get("url") {
                        deletes.lock().unwrap().push(url.clone());
                    }
                    axum::Json(json!({ "success": true }))
                }
            },
        ),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), log)
}

async fn serve_app_with_image_host(image_host_url: &str) -> String {
    let mut state = test_state(Arc::new(SqliteStore::new(test_pool())), None);
    state.image_host = Arc::new(ImageHostClient::new(image_host_url, None));
    serve_state(state).await
}

fn staged_files() -> Vec<UploadFile> {
    vec![
        UploadFile {
            file_name: "a.jpg".into(),
            content_type: "image/jpeg".into(),
            bytes: b"front".to_vec(),
        },
        UploadFile {
            file_name: "b.jpg".into(),
            content_type: "image/jpeg".into(),
            bytes: b"side".to_vec(),
        },
    ]
}

#[tokio::test]
async fn test_saga_deletes_uploads_when_create_fails() {
    let (host_url, log) = stub_image_host().await;
    let base_url = serve_app_with_image_host(&host_url).await;
    let gateway = ProductGateway::new(GatewayOptions {
        base_url: Some(base_url),
        admin_token: Some(ADMIN_TOKEN.to_string()),
        ..Default::default()
    })
    .with_image_host(ImageHostClient::new(&host_url, None));

    // Occupy the id so the create phase rejects the duplicate.
    gateway
        .create_product(&create_input("P1", "Gold Ring", "rings", 15000.0))
        .await
        .unwrap();

    let err = gateway
        .create_product_with_images(staged_files(), create_input("P1", "Duplicate", "rings", 1.0))
        .await
        .expect_err("Create phase should fail on the duplicate id");
    assert!(matches!(err, GatewayError::Api { status: 400, .. }));

    // Every uploaded image was deleted as compensation, none left behind.
    let uploads = log.uploads.lock().unwrap().clone();
    let deletes = log.deletes.lock().unwrap().clone();
    assert_eq!(uploads.len(), 2);
    assert_eq!(deletes, uploads);
}

#[tokio::test]
async fn test_saga_without_image_host_leaves_uploads_in_place() {
    let (host_url, log) = stub_image_host().await;
    let base_url = serve_app_with_image_host(&host_url).await;
    // No image host attached: orphans are logged, never deleted.
    let gateway = ProductGateway::new(GatewayOptions {
        base_url: Some(base_url),
        admin_token: Some(ADMIN_TOKEN.to_string()),
        ..Default::default()
    });

    gateway
        .create_product(&create_input("P1", "Gold Ring", "rings", 15000.0))
        .await
        .unwrap();

    let err = gateway
        .create_product_with_images(staged_files(), create_input("P1", "Duplicate", "rings", 1.0))
        .await
        .expect_err("Create phase should fail on the duplicate id");
    assert!(matches!(err, GatewayError::Api { status: 400, .. }));

    assert_eq!(log.uploads.lock().unwrap().len(), 2);
    assert!(log.deletes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_saga_success_carries_hosted_urls() {
    let (host_url, log) = stub_image_host().await;
    let base_url = serve_app_with_image_host(&host_url).await;
    let gateway = ProductGateway::new(GatewayOptions {
        base_url: Some(base_url),
        admin_token: Some(ADMIN_TOKEN.to_string()),
        ..Default::default()
    })
    .with_image_host(ImageHostClient::new(&host_url, None));

    let product = gateway
        .create_product_with_images(staged_files(), create_input("P1", "Gold Ring", "rings", 15000.0))
        .await
        .unwrap();

    // Hosted URLs land on the product in upload order; nothing is deleted.
    assert_eq!(product.images, log.uploads.lock().unwrap().clone());
    assert_eq!(product.images.len(), 2);
    assert!(log.deletes.lock().unwrap().is_empty());
}
