// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Analyze endpoint handler

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use bytes::Bytes;
use tracing::{debug, info, warn};

use super::response::AnalyzeResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;

/// Multipart field carrying the photo
pub const FILE_FIELD: &str = "file";

/// POST /analyze - Count vehicles in a parking-lot photo
///
/// Accepts a multipart upload with an image in the `file` field and returns
/// the detected vehicles, an occupancy estimate and a base64 JPEG with the
/// detections drawn on it.
///
/// # Errors
/// - 400 Bad Request: missing `file` field, non-image content type, undecodable
///   or oversized image
/// - 503 Service Unavailable: no detector loaded
/// - 500 Internal Server Error: detection or encoding failed
pub async fn analyze_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let analyzer = state.analyzer.clone().ok_or_else(|| {
        ApiError::ServiceUnavailable("Detection model not loaded".to_string())
    })?;

    let mut multipart =
        multipart.map_err(|e| ApiError::InvalidRequest(format!("Invalid multipart body: {}", e)))?;
    let (file_name, image_bytes) = read_image_field(&mut multipart).await?;

    debug!(
        "Analyze request: file={:?}, {} bytes",
        file_name,
        image_bytes.len()
    );

    let result = tokio::task::spawn_blocking(move || analyzer.analyze(&image_bytes))
        .await
        .map_err(|e| ApiError::InternalError(format!("Error processing image: {}", e)))??;

    info!(
        "Analyzed {:?}: {} vehicles, {}/{} spots vacant",
        file_name, result.occupied_spots, result.vacant_spots, result.total_spots
    );

    Ok(Json(AnalyzeResponse::new(result)))
}

/// Pull the `file` field out of the upload, skipping any other fields
async fn read_image_field(
    multipart: &mut Multipart,
) -> Result<(Option<String>, Bytes), ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(upload_error)?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let is_image = field
            .content_type()
            .map(|ct| ct.starts_with("image/"))
            .unwrap_or(false);
        if !is_image {
            warn!("Rejected upload with content type {:?}", field.content_type());
            return Err(ApiError::ValidationError {
                field: FILE_FIELD.to_string(),
                message: "Invalid file format. Please upload an image.".to_string(),
            });
        }

        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await.map_err(upload_error)?;
        return Ok((file_name, bytes));
    }

    Err(ApiError::ValidationError {
        field: FILE_FIELD.to_string(),
        message: "No file uploaded".to_string(),
    })
}

/// Map a multipart read failure; a body over the size limit is an oversized image
fn upload_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        warn!("Rejected upload over the body limit: {}", err);
        ApiError::InvalidRequest("Invalid image format".to_string())
    } else {
        ApiError::InvalidRequest(format!("Invalid multipart body: {}", err))
    }
}
