//! Upload validation for the edit endpoint.

use crate::backend::{file_extension, EditRequest, ALLOWED_EXTENSIONS};
use crate::error::{GatewayError, Result};
use bytes::Bytes;

/// A raw file field pulled from the multipart body, not yet validated.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Filename as sent by the client.
    pub filename: String,
    /// File contents.
    pub bytes: Bytes,
}

/// Returns whether `filename` carries an allowed image extension.
pub fn allowed_file(filename: &str) -> bool {
    file_extension(filename)
        .map(|ext| ALLOWED_EXTENSIONS.iter().any(|a| a.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// Validates the collected form fields and produces an [`EditRequest`].
///
/// Checks run in a fixed order and the first failure wins: file field
/// present, prompt non-empty after trimming, filename present, extension in
/// the allowed set. Each failure carries its own user-facing message.
pub fn validate_upload(file: Option<UploadedFile>, prompt: Option<String>) -> Result<EditRequest> {
    let file = file.ok_or_else(|| GatewayError::Validation("No image uploaded".into()))?;

    let prompt = prompt.as_deref().map(str::trim).unwrap_or_default();
    if prompt.is_empty() {
        return Err(GatewayError::Validation(
            "Please provide an editing prompt".into(),
        ));
    }

    if file.filename.is_empty() {
        return Err(GatewayError::Validation("No image selected".into()));
    }

    if !allowed_file(&file.filename) {
        return Err(GatewayError::Validation(
            "Invalid file type. Use PNG, JPG, JPEG, GIF, or WEBP".into(),
        ));
    }

    let extension = file_extension(&file.filename)
        .unwrap_or_default()
        .to_ascii_lowercase();

    Ok(EditRequest {
        bytes: file.bytes,
        extension,
        prompt: prompt.to_string(),
    })
}
