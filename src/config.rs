//! Process-wide configuration, read once at startup.

use std::env;
use std::path::PathBuf;

/// Model used when `GEMINI_MODEL` is not set.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash-preview-image-generation";

/// Which backend strategy serves edit requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// Direct Gemini `generateContent` call with inline image bytes.
    #[default]
    Gemini,
    /// External HTTP relay that fetches the staged image by URL.
    Relay,
}

impl BackendKind {
    /// Parses the `EDIT_BACKEND` setting; unknown values fall back to gemini.
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "relay" => Self::Relay,
            _ => Self::Gemini,
        }
    }

    /// Name used in configuration and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Relay => "relay",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Immutable configuration for one gateway process.
///
/// Missing credentials do not fail startup; the affected backend reports
/// itself unconfigured and every edit request gets a configuration error.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// Backend strategy selected for this deployment.
    pub backend: BackendKind,
    /// Gemini API key, if present.
    pub gemini_api_key: Option<String>,
    /// Gemini model identifier.
    pub gemini_model: String,
    /// Relay endpoint URL, if present.
    pub relay_url: Option<String>,
    /// Externally visible host used to build staged-image URLs.
    pub public_host: Option<String>,
    /// Directory where relay uploads are staged.
    pub upload_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5000".to_string(),
            backend: BackendKind::Gemini,
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            relay_url: None,
            public_host: None,
            upload_dir: PathBuf::from("uploads"),
        }
    }
}

impl AppConfig {
    /// Reads configuration from the environment, applying defaults.
    pub fn from_env() -> Self {
        Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".to_string()),
            backend: env::var("EDIT_BACKEND")
                .map(|v| BackendKind::parse(&v))
                .unwrap_or_default(),
            gemini_api_key: env::var("GEMINI_API_KEY").ok().filter(|v| !v.is_empty()),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string()),
            relay_url: env::var("RELAY_URL").ok().filter(|v| !v.is_empty()),
            public_host: env::var("PUBLIC_HOST")
                .ok()
                .filter(|v| !v.is_empty())
                .map(|v| v.trim_end_matches('/').to_string()),
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("uploads")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_kind_parse() {
        assert_eq!(BackendKind::parse("relay"), BackendKind::Relay);
        assert_eq!(BackendKind::parse("RELAY"), BackendKind::Relay);
        assert_eq!(BackendKind::parse("gemini"), BackendKind::Gemini);
        assert_eq!(BackendKind::parse("something-else"), BackendKind::Gemini);
    }

    #[test]
    fn test_backend_kind_display() {
        assert_eq!(BackendKind::Gemini.to_string(), "gemini");
        assert_eq!(BackendKind::Relay.to_string(), "relay");
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.bind_addr, "0.0.0.0:5000");
        assert_eq!(config.backend, BackendKind::Gemini);
        assert_eq!(config.gemini_model, DEFAULT_GEMINI_MODEL);
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.upload_dir, PathBuf::from("uploads"));
    }
}
