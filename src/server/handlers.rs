//! HTTP handlers for the gateway.

use crate::error::{GatewayError, Result};
use crate::server::envelope::ApiEnvelope;
use crate::server::validate::{validate_upload, UploadedFile};
use crate::server::AppState;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::response::Html;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

/// Static upload page.
pub async fn index() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}

/// Health probe body; reports configuration state, no live backend check.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "healthy" while the process serves requests.
    pub status: &'static str,
    /// Whether the backend has the configuration it needs.
    pub api_configured: bool,
}

/// `GET /health`
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        api_configured: state.backend.configured(),
    })
}

/// `POST /edit-image`
///
/// Accepts a multipart body with an `image` file field and a `prompt` text
/// field, forwards the pair to the configured backend, and answers with the
/// uniform envelope. The configuration gate runs before the body is read.
pub async fn edit_image(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ApiEnvelope>> {
    state.backend.ensure_configured()?;

    let (file, prompt) = read_form(multipart).await?;
    let request = validate_upload(file, prompt)?;

    tracing::info!(
        prompt = %request.prompt,
        extension = %request.extension,
        "processing image edit request"
    );

    let edited = state.backend.edit(&request).await?;

    Ok(Json(ApiEnvelope::success(
        edited.image_value(),
        "Image edited successfully!",
    )))
}

/// Collects the `image` and `prompt` fields from the multipart body.
/// Unknown fields are skipped.
async fn read_form(mut multipart: Multipart) -> Result<(Option<UploadedFile>, Option<String>)> {
    let mut file = None;
    let mut prompt = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_form)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(bad_form)?;
                file = Some(UploadedFile { filename, bytes });
            }
            "prompt" => {
                prompt = Some(field.text().await.map_err(bad_form)?);
            }
            _ => {}
        }
    }

    Ok((file, prompt))
}

fn bad_form(err: MultipartError) -> GatewayError {
    GatewayError::Validation(format!("Invalid multipart form data: {err}"))
}
