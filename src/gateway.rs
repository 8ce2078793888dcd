//! Client data gateway for the storefront API.
//!
//! Shields callers from transport failures: reads degrade to the fixture
//! dataset when the API is unreachable (or when mock mode is set), while
//! write faults always propagate with a human-readable message - silently
//! dropping a write would corrupt caller expectations.

use reqwest::Client as HttpClient;
use serde::Deserialize;
use thiserror::Error;

use crate::config::Config;
use crate::images::{ImageHostClient, UploadFile};
use crate::mock::{get_mock_product_by_id, get_mock_products};
use crate::models::{CreateProduct, Product, ProductQuery};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("network error: {0}")]
    Transport(String),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("bad response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            GatewayError::Decode(e.to_string())
        } else {
            GatewayError::Transport(e.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;

/// Configuration options for the gateway client.
#[derive(Debug, Clone, Default)]
pub struct GatewayOptions {
    /// API base URL override (default: http://127.0.0.1:3000)
    pub base_url: Option<String>,
    /// Admin token attached to write operations.
    pub admin_token: Option<String>,
    /// Serve every read from the fixture dataset without touching the network.
    pub use_mock_data: bool,
    /// Substitute fixture data when a read faults (development tier only).
    pub fallback_on_fault: bool,
}

impl GatewayOptions {
    /// Options wired from the server configuration: a co-deployed client
    /// targets the configured base URL and inherits the tier's fallback
    /// policy.
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_url: Some(config.base_url.clone()),
            admin_token: config.admin_token.clone(),
            use_mock_data: config.use_mock_data,
            fallback_on_fault: config.dev_mode,
        }
    }
}

#[derive(Deserialize)]
struct ItemBody {
    success: bool,
    data: Option<Product>,
    error: Option<String>,
    details: Option<String>,
}

#[derive(Deserialize)]
struct ListBody {
    success: bool,
    products: Option<Vec<Product>>,
    error: Option<String>,
    details: Option<String>,
}

#[derive(Deserialize)]
struct UploadBody {
    success: bool,
    data: Option<Vec<String>>,
    error: Option<String>,
    details: Option<String>,
}

fn api_error(status: u16, error: Option<String>, details: Option<String>) -> GatewayError {
    let message = match (error, details) {
        (Some(e), Some(d)) => format!("{}: {}", e, d),
        (Some(e), None) => e,
        (None, Some(d)) => d,
        (None, None) => format!("request failed with status {}", status),
    };
    GatewayError::Api { status, message }
}

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";

/// Storefront API client.
pub struct ProductGateway {
    base_url: String,
    admin_token: Option<String>,
    use_mock_data: bool,
    fallback_on_fault: bool,
    image_host: Option<ImageHostClient>,
    http: HttpClient,
}

impl ProductGateway {
    pub fn new(options: GatewayOptions) -> Self {
        let base_url = options
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Self {
            base_url,
            admin_token: options.admin_token,
            use_mock_data: options.use_mock_data,
            fallback_on_fault: options.fallback_on_fault,
            image_host: None,
            http: HttpClient::new(),
        }
    }

    /// Attach an image host client so the create saga can delete orphaned
    /// uploads when the create phase fails. Without one, orphans are only
    /// logged.
    pub fn with_image_host(mut self, image_host: ImageHostClient) -> Self {
        self.image_host = Some(image_host);
        self
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.admin_token {
            Some(ref token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Fetch products, optionally filtered and sorted. Transport and decode
    /// faults degrade to fixture data when fallback is enabled.
    pub async fn get_products(&self, query: &ProductQuery) -> Result<Vec<Product>> {
        if self.use_mock_data {
            return Ok(get_mock_products(query));
        }

        match self.fetch_products(query).await {
            Ok(products) => Ok(products),
            Err(e) if self.fallback_on_fault => {
                tracing::warn!("Product listing failed, falling back to fixtures: {}", e);
                Ok(get_mock_products(query))
            }
            Err(e) => Err(e),
        }
    }

    async fn fetch_products(&self, query: &ProductQuery) -> Result<Vec<Product>> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(ref category) = query.category {
            params.push(("category", category.clone()));
        }
        if let Some(sort) = query.sort {
            let key = match sort {
                crate::models::SortKey::PriceAsc => "price_asc",
                crate::models::SortKey::PriceDesc => "price_desc",
                crate::models::SortKey::Newest => "newest",
                crate::models::SortKey::Popular => "popular",
            };
            params.push(("sort", key.to_string()));
        }

        let response = self
            .http
            .get(format!("{}/products", self.base_url))
            .query(&params)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body: ListBody = response.json().await?;
        if !body.success {
            return Err(api_error(status, body.error, body.details));
        }
        Ok(body.products.unwrap_or_default())
    }

    /// Fetch a single product by external id. Returns Ok(None) for a missing
    /// product; faults degrade to fixture data when fallback is enabled.
    pub async fn get_product_by_id(&self, product_id: &str) -> Result<Option<Product>> {
        if self.use_mock_data {
            return Ok(get_mock_product_by_id(product_id));
        }

        match self.fetch_product(product_id).await {
            Ok(product) => Ok(product),
            Err(GatewayError::Api { status: 404, .. }) => Ok(None),
            Err(e) if self.fallback_on_fault => {
                tracing::warn!("Product read failed, falling back to fixtures: {}", e);
                Ok(get_mock_product_by_id(product_id))
            }
            Err(e) => Err(e),
        }
    }

    async fn fetch_product(&self, product_id: &str) -> Result<Option<Product>> {
        let response = self
            .http
            .get(format!("{}/products/{}", self.base_url, product_id))
            .send()
            .await?;

        let status = response.status().as_u16();
        let body: ItemBody = response.json().await?;
        if !body.success {
            return Err(api_error(status, body.error, body.details));
        }
        Ok(body.data)
    }

    /// Create a product. Write faults are never masked.
    pub async fn create_product(&self, input: &CreateProduct) -> Result<Product> {
        let response = self
            .authorized(self.http.post(format!("{}/products", self.base_url)))
            .json(input)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body: ItemBody = response.json().await?;
        if !body.success {
            return Err(api_error(status, body.error, body.details));
        }
        body.data
            .ok_or_else(|| GatewayError::Decode("create response missing data".into()))
    }

    /// Apply a partial update. `patch` carries only the fields to change.
    pub async fn update_product(
        &self,
        product_id: &str,
        patch: &serde_json::Value,
    ) -> Result<Product> {
        let response = self
            .authorized(
                self.http
                    .put(format!("{}/products/{}", self.base_url, product_id)),
            )
            .json(patch)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body: ItemBody = response.json().await?;
        if !body.success {
            return Err(api_error(status, body.error, body.details));
        }
        body.data
            .ok_or_else(|| GatewayError::Decode("update response missing data".into()))
    }

    /// Delete a product. Write faults are never masked.
    pub async fn delete_product(&self, product_id: &str) -> Result<()> {
        let response = self
            .authorized(
                self.http
                    .delete(format!("{}/products/{}", self.base_url, product_id)),
            )
            .send()
            .await?;

        let status = response.status().as_u16();
        #[derive(Deserialize)]
        struct DeleteBody {
            success: bool,
            error: Option<String>,
            details: Option<String>,
        }
        let body: DeleteBody = response.json().await?;
        if !body.success {
            return Err(api_error(status, body.error, body.details));
        }
        Ok(())
    }

    /// Upload raw image files through the API's upload proxy. Returns hosted
    /// URLs in input order.
    pub async fn upload_images(&self, files: Vec<UploadFile>) -> Result<Vec<String>> {
        let mut form = reqwest::multipart::Form::new();
        for file in files {
            let part = reqwest::multipart::Part::bytes(file.bytes)
                .file_name(file.file_name)
                .mime_str(&file.content_type)
                .map_err(|e| GatewayError::Decode(format!("invalid content type: {}", e)))?;
            form = form.part("files", part);
        }

        let response = self
            .authorized(self.http.post(format!("{}/upload", self.base_url)))
            .multipart(form)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body: UploadBody = response.json().await?;
        if !body.success {
            return Err(api_error(status, body.error, body.details));
        }
        body.data
            .ok_or_else(|| GatewayError::Decode("upload response missing data".into()))
    }

    /// Two-phase create: upload staged images, then create the product with
    /// the hosted URLs. The phases are not transactional; on create failure
    /// the uploaded images are deleted as a compensating action (or logged as
    /// orphans when no image host client is attached).
    pub async fn create_product_with_images(
        &self,
        files: Vec<UploadFile>,
        mut input: CreateProduct,
    ) -> Result<Product> {
        let uploaded = if files.is_empty() {
            Vec::new()
        } else {
            self.upload_images(files).await?
        };
        input.images = uploaded.clone();

        match self.create_product(&input).await {
            Ok(product) => Ok(product),
            Err(e) => {
                self.cleanup_uploads(&uploaded).await;
                Err(e)
            }
        }
    }

    async fn cleanup_uploads(&self, urls: &[String]) {
        if urls.is_empty() {
            return;
        }
        let Some(ref image_host) = self.image_host else {
            tracing::warn!("Create failed, leaving orphaned uploads: {:?}", urls);
            return;
        };
        for url in urls {
            if let Err(e) = image_host.delete_image(url).await {
                tracing::warn!("Failed to delete orphaned upload {}: {}", url, e);
            }
        }
    }
}
