//! Backend implementations.

mod gemini;
mod relay;

pub use gemini::{GeminiBackend, GeminiBackendBuilder};
pub use relay::{RelayBackend, RelayBackendBuilder};
