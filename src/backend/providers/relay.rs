//! HTTP relay edit backend.
//!
//! Stages the upload on local disk so the relay can fetch it back by URL,
//! then asks the relay endpoint to perform the edit.

use crate::backend::provider::EditBackend;
use crate::backend::types::{EditRequest, EditedImage};
use crate::config::BackendKind;
use crate::error::{sanitize_error_message, GatewayError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use uuid::Uuid;

/// Deadline for a single relay call.
const RELAY_TIMEOUT: Duration = Duration::from_secs(60);

/// Builder for [`RelayBackend`].
#[derive(Debug, Clone)]
pub struct RelayBackendBuilder {
    endpoint: Option<String>,
    public_host: Option<String>,
    upload_dir: PathBuf,
    timeout: Duration,
}

impl Default for RelayBackendBuilder {
    fn default() -> Self {
        Self {
            endpoint: None,
            public_host: None,
            upload_dir: PathBuf::from("uploads"),
            timeout: RELAY_TIMEOUT,
        }
    }
}

impl RelayBackendBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the relay endpoint URL.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets the externally visible host used in staged-image URLs.
    /// A trailing slash is stripped.
    pub fn public_host(mut self, host: impl Into<String>) -> Self {
        self.public_host = Some(host.into().trim_end_matches('/').to_string());
        self
    }

    /// Sets the staging directory.
    pub fn upload_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.upload_dir = dir.into();
        self
    }

    /// Sets the deadline for the relay call.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the backend.
    pub fn build(self) -> Result<RelayBackend> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| GatewayError::Internal(e.to_string()))?;

        Ok(RelayBackend {
            client,
            endpoint: self.endpoint,
            public_host: self.public_host,
            upload_dir: self.upload_dir,
        })
    }
}

/// Edit backend that drives an external relay over plain HTTP.
///
/// The relay cannot accept raw bytes; it fetches the image back from this
/// gateway via `GET /uploads/{filename}` while the request is in flight.
pub struct RelayBackend {
    client: reqwest::Client,
    endpoint: Option<String>,
    public_host: Option<String>,
    upload_dir: PathBuf,
}

impl RelayBackend {
    /// Creates a new [`RelayBackendBuilder`].
    pub fn builder() -> RelayBackendBuilder {
        RelayBackendBuilder::new()
    }

    fn endpoints(&self) -> Result<(&str, &str)> {
        match (self.endpoint.as_deref(), self.public_host.as_deref()) {
            (Some(endpoint), Some(host)) => Ok((endpoint, host)),
            _ => Err(GatewayError::Config(
                "RELAY_URL and PUBLIC_HOST not configured".into(),
            )),
        }
    }

    async fn edit_impl(&self, request: &EditRequest) -> Result<EditedImage> {
        let (endpoint, host) = self.endpoints()?;

        let staged =
            StagedFile::create(&self.upload_dir, &request.extension, &request.bytes).await?;
        let image_url = staged.url(host);

        tracing::debug!(image_url = %image_url, "forwarding edit request to relay");

        let result = self.call_relay(endpoint, &request.prompt, &image_url).await;
        drop(staged);
        result
    }

    async fn call_relay(
        &self,
        endpoint: &str,
        prompt: &str,
        image_url: &str,
    ) -> Result<EditedImage> {
        let response = self
            .client
            .get(endpoint)
            .query(&[("prompt", prompt), ("imageUrl", image_url)])
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let text = response.text().await.unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                body = %sanitize_error_message(&text),
                "relay call failed"
            );
            return Err(GatewayError::Api {
                status: status.as_u16(),
            });
        }

        match response.json().await {
            Ok(parsed) => interpret_relay_response(parsed),
            Err(_) => Err(GatewayError::EmptyResult("No image in API response".into())),
        }
    }
}

#[async_trait]
impl EditBackend for RelayBackend {
    async fn edit(&self, request: &EditRequest) -> Result<EditedImage> {
        self.edit_impl(request).await
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Relay
    }

    fn ensure_configured(&self) -> Result<()> {
        self.endpoints().map(|_| ())
    }
}

/// Maps the relay's JSON body onto a backend result.
fn interpret_relay_response(response: RelayResponse) -> Result<EditedImage> {
    match (response.success, response.image_url) {
        (Some(true), Some(url)) => Ok(EditedImage::Url(url)),
        (Some(false), _) => Err(GatewayError::Backend(
            response
                .error
                .unwrap_or_else(|| "Image editing failed".to_string()),
        )),
        _ => Err(GatewayError::EmptyResult("No image in API response".into())),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RelayResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// An uploaded image staged on disk for the duration of one relay call.
///
/// The file is removed when the value drops, on success and failure paths
/// alike; removal errors are swallowed.
struct StagedFile {
    path: PathBuf,
    filename: String,
}

impl StagedFile {
    /// Writes `bytes` under `dir` with a random unique name, preserving the
    /// original extension.
    async fn create(dir: &Path, extension: &str, bytes: &[u8]) -> Result<Self> {
        let filename = format!("{}.{extension}", Uuid::new_v4());
        let path = dir.join(&filename);

        tokio::fs::create_dir_all(dir).await?;
        tokio::fs::write(&path, bytes).await?;

        Ok(Self { path, filename })
    }

    /// Public URL at which the relay can fetch the staged file.
    fn url(&self, host: &str) -> String {
        format!("{host}/uploads/{}", self.filename)
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if let Err(err) = std::fs::remove_file(&self.path) {
            tracing::debug!(path = %self.path.display(), %err, "failed to remove staged file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> RelayResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_builder_defaults() {
        let backend = RelayBackendBuilder::new().build().unwrap();
        assert!(!backend.configured());
        assert_eq!(backend.upload_dir, PathBuf::from("uploads"));
    }

    #[test]
    fn test_builder_strips_trailing_slash_from_host() {
        let backend = RelayBackend::builder()
            .endpoint("https://relay.example/edit")
            .public_host("https://gateway.example/")
            .build()
            .unwrap();
        let (_, host) = backend.endpoints().unwrap();
        assert_eq!(host, "https://gateway.example");
    }

    #[test]
    fn test_unconfigured_error_message() {
        let backend = RelayBackendBuilder::new().build().unwrap();
        let err = backend.ensure_configured().unwrap_err();
        assert_eq!(err.to_string(), "RELAY_URL and PUBLIC_HOST not configured");
    }

    #[test]
    fn test_success_response_forwards_url() {
        let response = parse(r#"{"success":true,"imageUrl":"https://x/y.png"}"#);
        let image = interpret_relay_response(response).unwrap();
        assert_eq!(image, EditedImage::Url("https://x/y.png".to_string()));
    }

    #[test]
    fn test_failure_response_forwards_error_verbatim() {
        let response = parse(r#"{"success":false,"error":"boom"}"#);
        let err = interpret_relay_response(response).unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn test_failure_response_without_error_uses_fallback() {
        let response = parse(r#"{"success":false}"#);
        let err = interpret_relay_response(response).unwrap_err();
        assert_eq!(err.to_string(), "Image editing failed");
    }

    #[test]
    fn test_ambiguous_response_shapes() {
        for body in [r#"{}"#, r#"{"success":true}"#, r#"{"imageUrl":"x"}"#] {
            let err = interpret_relay_response(parse(body)).unwrap_err();
            assert_eq!(err.to_string(), "No image in API response");
        }
    }

    #[tokio::test]
    async fn test_staged_file_lifecycle() {
        let dir = std::env::temp_dir().join(format!("retouch-staging-{}", Uuid::new_v4()));

        let staged = StagedFile::create(&dir, "png", b"fake image").await.unwrap();
        assert!(staged.filename.ends_with(".png"));
        assert!(staged.path.exists());
        assert_eq!(
            staged.url("https://gateway.example"),
            format!("https://gateway.example/uploads/{}", staged.filename)
        );

        let path = staged.path.clone();
        drop(staged);
        assert!(!path.exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_staged_files_get_unique_names() {
        let dir = std::env::temp_dir().join(format!("retouch-staging-{}", Uuid::new_v4()));

        let first = StagedFile::create(&dir, "png", b"a").await.unwrap();
        let second = StagedFile::create(&dir, "png", b"b").await.unwrap();
        assert_ne!(first.filename, second.filename);

        drop(first);
        drop(second);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
