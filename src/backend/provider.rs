//! Backend trait shared by the edit strategies.

use crate::backend::providers::{GeminiBackend, RelayBackend};
use crate::backend::types::{EditRequest, EditedImage};
use crate::config::{AppConfig, BackendKind};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// A remote image-editing service the gateway forwards requests to.
///
/// One backend is built at startup from the configuration; the validator and
/// the response envelope are shared across strategies.
#[async_trait]
pub trait EditBackend: Send + Sync {
    /// Submits one edit request and returns the edited image.
    ///
    /// A single attempt per request; the gateway never retries.
    async fn edit(&self, request: &EditRequest) -> Result<EditedImage>;

    /// Which strategy this backend implements.
    fn kind(&self) -> BackendKind;

    /// Verifies the backend has the configuration it needs, failing with a
    /// configuration error otherwise.
    fn ensure_configured(&self) -> Result<()>;

    /// Whether the backend has the configuration it needs.
    fn configured(&self) -> bool {
        self.ensure_configured().is_ok()
    }
}

/// Builds the backend selected by `config`.
pub fn from_config(config: &AppConfig) -> Result<Arc<dyn EditBackend>> {
    match config.backend {
        BackendKind::Gemini => {
            let mut builder = GeminiBackend::builder().model(config.gemini_model.clone());
            if let Some(key) = &config.gemini_api_key {
                builder = builder.api_key(key.clone());
            }
            Ok(Arc::new(builder.build()?))
        }
        BackendKind::Relay => {
            let mut builder = RelayBackend::builder().upload_dir(config.upload_dir.clone());
            if let Some(endpoint) = &config.relay_url {
                builder = builder.endpoint(endpoint.clone());
            }
            if let Some(host) = &config.public_host {
                builder = builder.public_host(host.clone());
            }
            Ok(Arc::new(builder.build()?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_selects_gemini() {
        let config = AppConfig {
            backend: BackendKind::Gemini,
            gemini_api_key: Some("test-key".to_string()),
            ..AppConfig::default()
        };
        let backend = from_config(&config).unwrap();
        assert_eq!(backend.kind(), BackendKind::Gemini);
        assert!(backend.configured());
    }

    #[test]
    fn test_from_config_selects_relay() {
        let config = AppConfig {
            backend: BackendKind::Relay,
            relay_url: Some("https://relay.example/edit".to_string()),
            public_host: Some("https://gateway.example".to_string()),
            ..AppConfig::default()
        };
        let backend = from_config(&config).unwrap();
        assert_eq!(backend.kind(), BackendKind::Relay);
        assert!(backend.configured());
    }

    #[test]
    fn test_missing_credentials_build_unconfigured_backend() {
        let backend = from_config(&AppConfig::default()).unwrap();
        assert!(!backend.configured());
        assert!(backend.ensure_configured().is_err());
    }
}
