use std::sync::Arc;

use axum::{
    extract::{Multipart, State, multipart::MultipartRejection},
    response::Response,
};
use serde::Serialize;
use tracing::info;

use crate::{
    error::{AppError, OrInternal},
    routes::ok,
    state::AppState,
    utils::{image_key, public_url, validate_image},
};

/// Multipart bodies up to this size reach the handler, which then applies
/// the real image limit.
pub const UPLOAD_BODY_LIMIT: usize = 32 * 1024 * 1024;

const IMAGE_FIELD: &str = "image";

#[derive(Serialize)]
struct UploadedImage {
    filename: String,
    url: String,
}

pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, AppError> {
    let mut multipart = multipart?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(IMAGE_FIELD) || field.file_name().is_none() {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        let data = field.bytes().await?;

        validate_image(&content_type, data.len())?;

        let key = image_key(&content_type);
        let size = data.len();

        state
            .images
            .put(&key, data, &content_type)
            .await
            .or_internal("Failed to upload image")?;

        info!(key = %key, size, "Stored menu image");

        let url = public_url(&state.config.image_public_url, &key);
        return Ok(ok(UploadedImage { filename: key, url }));
    }

    Err(AppError::malformed("No image file provided"))
}
