//! Core types for edit requests and backend results.

use base64::Engine;
use bytes::Bytes;

/// File extensions accepted for upload.
pub const ALLOWED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];

/// Returns the extension of `filename`, if it contains a `.` separator.
pub fn file_extension(filename: &str) -> Option<&str> {
    filename.rsplit_once('.').map(|(_, ext)| ext)
}

/// A validated image-edit request, consumed once by a backend call.
#[derive(Debug, Clone)]
pub struct EditRequest {
    /// Raw uploaded image bytes.
    pub bytes: Bytes,
    /// Lowercased file extension from the original upload.
    pub extension: String,
    /// Editing instruction, trimmed.
    pub prompt: String,
}

impl EditRequest {
    /// Declared mime type derived from the extension; `jpg` maps to
    /// `image/jpeg`, every other allowed extension to `image/<ext>`.
    pub fn mime_type(&self) -> String {
        match self.extension.as_str() {
            "jpg" => "image/jpeg".to_string(),
            ext => format!("image/{ext}"),
        }
    }
}

/// The outcome of a successful backend call; exactly one shape per result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditedImage {
    /// Inline binary image returned by the backend.
    Inline {
        /// Raw image bytes.
        bytes: Vec<u8>,
        /// Mime type declared by the backend.
        mime_type: String,
    },
    /// URL at which the edited image can be fetched.
    Url(String),
}

impl EditedImage {
    /// Renders the `image` value for the response envelope.
    ///
    /// Inline bytes are base64-encoded into a `data:image/png;base64,` URI
    /// regardless of the declared mime type; URLs pass through unchanged.
    pub fn image_value(&self) -> String {
        match self {
            Self::Inline { bytes, .. } => format!(
                "data:image/png;base64,{}",
                base64::engine::general_purpose::STANDARD.encode(bytes)
            ),
            Self::Url(url) => url.clone(),
        }
    }
}
