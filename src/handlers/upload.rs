use axum::extract::{Multipart, State};

use crate::db::AppState;
use crate::error::{AppError, Result};
use crate::extractors::Json;
use crate::images::UploadFile;

/// Proxy a multipart file set to the external image host.
///
/// Returns hosted URLs in the order the files were sent. This is phase one of
/// the two-phase create flow; the caller includes the URLs in the subsequent
/// create-product call.
pub async fn upload_images(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>> {
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart body: {}", e)))?
    {
        if field.name() != Some("files") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("failed to read file: {}", e)))?
            .to_vec();

        files.push(UploadFile {
            file_name,
            content_type,
            bytes,
        });
    }

    if files.is_empty() {
        return Err(AppError::Validation("no files supplied".into()));
    }

    let urls = state.image_host.upload(&files).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": urls })))
}
