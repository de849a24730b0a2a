//! HTTP surface of the gateway.

mod envelope;
mod handlers;
mod validate;

pub use envelope::ApiEnvelope;
pub use validate::{allowed_file, validate_upload, UploadedFile};

use crate::backend::EditBackend;
use crate::config::{AppConfig, BackendKind};
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Uploads larger than this are rejected by the transport layer before the
/// pipeline sees them.
pub const MAX_CONTENT_LENGTH: usize = 16 * 1024 * 1024;

/// Shared state handed to every handler.
pub struct AppState {
    /// Process configuration.
    pub config: AppConfig,
    /// The backend built for this deployment.
    pub backend: Arc<dyn EditBackend>,
}

/// Builds the gateway router.
///
/// The `/uploads` file service is mounted only for the relay backend, which
/// needs staged files reachable by URL.
pub fn router(config: AppConfig, backend: Arc<dyn EditBackend>) -> Router {
    let serve_uploads = config.backend == BackendKind::Relay;
    let upload_dir = config.upload_dir.clone();

    let state = Arc::new(AppState { config, backend });

    let mut router = Router::new()
        .route("/", get(handlers::index))
        .route("/edit-image", post(handlers::edit_image))
        .route("/health", get(handlers::health));

    if serve_uploads {
        router = router.nest_service("/uploads", ServeDir::new(upload_dir));
    }

    router
        .layer(DefaultBodyLimit::max(MAX_CONTENT_LENGTH))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
