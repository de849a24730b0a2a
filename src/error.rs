//! Error types for the edit gateway.

/// Errors that can occur while handling an edit request.
///
/// Every variant's display string is exactly what the client sees in the
/// response envelope; anything more detailed stays in the server log.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The upload failed validation.
    #[error("{0}")]
    Validation(String),

    /// A required credential or endpoint is missing from the configuration.
    #[error("{0}")]
    Config(String),

    /// The backend call exceeded its deadline.
    #[error("Request timeout")]
    Timeout,

    /// The backend answered with a non-success HTTP status.
    #[error("API error: {status}")]
    Api {
        /// HTTP status returned by the backend.
        status: u16,
    },

    /// Transport-level failure talking to the backend.
    #[error("API error: {0}")]
    Transport(String),

    /// The backend answered successfully but carried no usable image.
    #[error("{0}")]
    EmptyResult(String),

    /// The backend reported a failure of its own; forwarded verbatim.
    #[error("{0}")]
    Backend(String),

    /// Catch-all for anything not classified above.
    #[error("Error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<std::io::Error> for GatewayError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Result type alias for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Truncates provider response bodies so log and error strings stay bounded.
pub(crate) fn sanitize_error_message(text: &str) -> String {
    const MAX_LEN: usize = 300;

    let trimmed = text.trim();
    match trimmed.char_indices().nth(MAX_LEN) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_strings() {
        assert_eq!(GatewayError::Timeout.to_string(), "Request timeout");
        assert_eq!(
            GatewayError::Api { status: 502 }.to_string(),
            "API error: 502"
        );
        assert_eq!(
            GatewayError::Validation("No image uploaded".into()).to_string(),
            "No image uploaded"
        );
        assert_eq!(
            GatewayError::Internal("boom".into()).to_string(),
            "Error: boom"
        );
        assert_eq!(GatewayError::Backend("boom".into()).to_string(), "boom");
    }

    #[test]
    fn test_io_error_maps_to_internal() {
        let err: GatewayError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        assert!(matches!(err, GatewayError::Internal(_)));
        assert_eq!(err.to_string(), "Error: denied");
    }

    #[test]
    fn test_sanitize_short_message_unchanged() {
        assert_eq!(sanitize_error_message("  bad request \n"), "bad request");
    }

    #[test]
    fn test_sanitize_truncates_long_message() {
        let long = "x".repeat(1000);
        let sanitized = sanitize_error_message(&long);
        assert_eq!(sanitized.len(), 303);
        assert!(sanitized.ends_with("..."));
    }
}
