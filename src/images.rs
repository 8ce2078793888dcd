//! HTTP client for the external image-hosting provider.
//!
//! Files are uploaded one at a time so the returned URL sequence preserves the
//! caller's ordering. Upload and product-create are two separate phases with
//! no transaction between them; `delete_image` exists as the compensating
//! cleanup for orphaned uploads when the create phase fails.

use reqwest::Client;
use serde::Deserialize;

use crate::error::{AppError, Result};

#[derive(Debug, Deserialize)]
struct HostedImage {
    url: String,
}

/// A raw image file staged for upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ImageHostClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl ImageHostClient {
    pub fn new(base_url: &str, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Upload a batch of files, returning hosted URLs in input order.
    pub async fn upload(&self, files: &[UploadFile]) -> Result<Vec<String>> {
        let mut urls = Vec::with_capacity(files.len());
        for file in files {
            urls.push(self.upload_one(file).await?);
        }
        Ok(urls)
    }

    async fn upload_one(&self, file: &UploadFile) -> Result<String> {
        let part = reqwest::multipart::Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)
            .map_err(|e| AppError::Upstream(format!("invalid content type: {}", e)))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let mut request = self
            .client
            .post(format!("{}/v1/images", self.base_url))
            .multipart(form);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("image host unreachable: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "image host returned {}: {}",
                status, body
            )));
        }

        let hosted: HostedImage = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("bad image host response: {}", e)))?;
        Ok(hosted.url)
    }

    /// Delete a previously hosted image. Used by the create saga's cleanup
    /// path; a failure here is reported, not retried.
    pub async fn delete_image(&self, url: &str) -> Result<()> {
        let mut request = self
            .client
            .delete(format!("{}/v1/images", self.base_url))
            .query(&[("url", url)]);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("image host unreachable: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "image host returned {} on delete",
                response.status()
            )));
        }
        Ok(())
    }
}
