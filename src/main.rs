use anyhow::Context;
use retouch::config::AppConfig;
use retouch::{backend, server};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env();
    let backend = backend::from_config(&config)?;

    if !backend.configured() {
        tracing::warn!(
            backend = %config.backend,
            "backend is missing configuration; edit requests will fail until it is set"
        );
    }

    let addr = config.bind_addr.clone();
    let app = server::router(config, backend);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
