//! The uniform JSON envelope returned for every outcome.

use crate::error::GatewayError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

/// Response body shared by every endpoint outcome.
///
/// `success: true` carries `image` and `message`; `success: false` carries
/// `error`. Absent fields are omitted from the JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope {
    /// Whether the edit succeeded.
    pub success: bool,
    /// Edited image as a data URI or URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Human-readable success message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Human-readable error message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiEnvelope {
    /// Success envelope: `image` and `message` set, `error` absent.
    pub fn success(image: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            image: Some(image.into()),
            message: Some(message.into()),
            error: None,
        }
    }

    /// Failure envelope: `error` set, `image` and `message` absent.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            image: None,
            message: None,
            error: Some(error.into()),
        }
    }
}

impl GatewayError {
    /// HTTP status this error maps to at the handler boundary.
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::error!(status = status.as_u16(), "edit request failed: {self}");
        (status, Json(ApiEnvelope::failure(self.to_string()))).into_response()
    }
}
