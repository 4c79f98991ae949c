//! Image upload route handler.
//!
//! Accepts a single multipart image field, writes it to the configured
//! upload directory under a fresh UUID filename, and returns the public
//! path. Files are served statically under `/uploads`.

use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Allowed image extensions, lowercase.
const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Allowed content types for the image field.
const ALLOWED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

/// Upload response: the public image path to store on a product.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub image: String,
}

/// `POST /api/upload` - Store an image (admin).
#[instrument(skip_all)]
pub async fn upload(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>)> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid multipart payload: {e}")))?
        .ok_or_else(|| AppError::BadRequest("no file in upload".to_owned()))?;

    let extension = field
        .file_name()
        .and_then(|name| name.rsplit('.').next())
        .map(str::to_lowercase)
        .ok_or_else(|| AppError::BadRequest("file name has no extension".to_owned()))?;

    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(AppError::BadRequest(format!(
            "unsupported image extension: {extension}"
        )));
    }

    let content_type = field
        .content_type()
        .map(str::to_owned)
        .ok_or_else(|| AppError::BadRequest("missing content type".to_owned()))?;

    if !ALLOWED_CONTENT_TYPES.contains(&content_type.as_str()) {
        return Err(AppError::BadRequest(format!(
            "unsupported content type: {content_type}"
        )));
    }

    let data = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(format!("failed to read upload: {e}")))?;

    let filename = format!("{}.{extension}", Uuid::new_v4());
    let dir = &state.config().upload_dir;

    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| AppError::Internal(format!("failed to create upload dir: {e}")))?;
    tokio::fs::write(dir.join(&filename), &data)
        .await
        .map_err(|e| AppError::Internal(format!("failed to write upload: {e}")))?;

    tracing::info!(filename = %filename, size = data.len(), "image uploaded");

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            image: format!("/uploads/{filename}"),
        }),
    ))
}
