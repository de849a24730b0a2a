//! Gemini (Google) edit backend.

use crate::backend::provider::EditBackend;
use crate::backend::types::{EditRequest, EditedImage};
use crate::config::{BackendKind, DEFAULT_GEMINI_MODEL};
use crate::error::{sanitize_error_message, GatewayError, Result};
use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Builder for [`GeminiBackend`].
#[derive(Debug, Clone)]
pub struct GeminiBackendBuilder {
    api_key: Option<String>,
    model: String,
    timeout: Duration,
}

impl Default for GeminiBackendBuilder {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

impl GeminiBackendBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key. Without one the backend reports itself unconfigured
    /// and every edit request fails with a configuration error.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the model identifier.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the deadline for the provider call.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the backend.
    pub fn build(self) -> Result<GeminiBackend> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| GatewayError::Internal(e.to_string()))?;

        Ok(GeminiBackend {
            client,
            api_key: self.api_key,
            model: self.model,
        })
    }
}

/// Edit backend that calls the Gemini `generateContent` API directly,
/// submitting the image inline and requesting image-modality output.
pub struct GeminiBackend {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
}

impl GeminiBackend {
    /// Creates a new [`GeminiBackendBuilder`].
    pub fn builder() -> GeminiBackendBuilder {
        GeminiBackendBuilder::new()
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| GatewayError::Config("GEMINI_API_KEY not configured".into()))
    }

    async fn edit_impl(&self, request: &EditRequest) -> Result<EditedImage> {
        let api_key = self.api_key()?;

        let url = format!("{GEMINI_API_BASE}/{}:generateContent", self.model);
        let body = GeminiEditRequest::from_edit_request(request);

        tracing::debug!(
            model = %self.model,
            mime_type = %request.mime_type(),
            "submitting edit request to Gemini"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                body = %sanitize_error_message(&text),
                "Gemini call failed"
            );
            return Err(GatewayError::Api {
                status: status.as_u16(),
            });
        }

        let parsed: GeminiResponse = response.json().await?;
        extract_inline_image(parsed)
    }
}

#[async_trait]
impl EditBackend for GeminiBackend {
    async fn edit(&self, request: &EditRequest) -> Result<EditedImage> {
        self.edit_impl(request).await
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Gemini
    }

    fn ensure_configured(&self) -> Result<()> {
        self.api_key().map(|_| ())
    }
}

/// Pulls the first non-empty inline-data part out of a Gemini response.
/// Remaining parts are ignored.
fn extract_inline_image(response: GeminiResponse) -> Result<EditedImage> {
    let content = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .ok_or_else(|| GatewayError::EmptyResult("No response from AI".into()))?;

    if content.parts.is_empty() {
        return Err(GatewayError::EmptyResult("No image generated".into()));
    }

    for part in content.parts {
        if let Some(inline) = part.inline_data {
            if !inline.data.is_empty() {
                let bytes = base64::engine::general_purpose::STANDARD
                    .decode(inline.data.as_bytes())
                    .map_err(|e| GatewayError::Internal(format!("invalid image payload: {e}")))?;
                return Ok(EditedImage::Inline {
                    bytes,
                    mime_type: inline.mime_type,
                });
            }
        }
    }

    Err(GatewayError::EmptyResult("No image in response".into()))
}

// Request/Response types
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiEditRequest {
    contents: Vec<GeminiContent>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiRequestPart>,
}

/// A part in a Gemini request, either inline image data or text.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum GeminiRequestPart {
    InlineData { inline_data: GeminiInlineData },
    Text { text: String },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    response_modalities: Vec<String>,
}

impl GeminiEditRequest {
    fn from_edit_request(request: &EditRequest) -> Self {
        let parts = vec![
            GeminiRequestPart::InlineData {
                inline_data: GeminiInlineData {
                    mime_type: request.mime_type(),
                    data: base64::engine::general_purpose::STANDARD.encode(&request.bytes),
                },
            },
            GeminiRequestPart::Text {
                text: request.prompt.clone(),
            },
        ];

        Self {
            contents: vec![GeminiContent { parts }],
            generation_config: GeminiGenerationConfig {
                response_modalities: vec!["IMAGE".to_string()],
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContentResponse>,
}

#[derive(Debug, Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponsePart {
    #[serde(default)]
    inline_data: Option<GeminiInlineDataResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineDataResponse {
    mime_type: String,
    data: String,
}
