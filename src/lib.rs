#![warn(missing_docs)]
//! Retouch - a web gateway for AI image editing.
//!
//! Accepts an uploaded image plus a text prompt over HTTP, forwards the pair
//! to a remote image-editing backend, and returns the edited image in a
//! uniform JSON envelope. Two interchangeable backends are provided, selected
//! by configuration at startup:
//!
//! - `gemini`: a direct Gemini `generateContent` call with inline image
//!   bytes, answering with a png data URI.
//! - `relay`: an external HTTP relay that fetches the upload back from this
//!   gateway by URL and answers with the edited image's URL.
//!
//! # Quick Start
//!
//! ```no_run
//! use retouch::{backend, server, AppConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::from_env();
//!     let backend = backend::from_config(&config)?;
//!     let app = server::router(config, backend);
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod server;

pub use config::{AppConfig, BackendKind};
pub use error::{GatewayError, Result};
