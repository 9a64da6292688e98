//! Presigned URL server
//!
//! Routes:
//! - `/api/presigned-url` - signed datasheet links (GET only, others get 405)
//! - `/health` - liveness probe
//!
//! Security: binds to 127.0.0.1 by default (localhost only).

mod error;
mod presigned_url;

pub use error::ApiError;
pub use presigned_url::presigned_url;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    routing::{any, get},
    Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;

use crate::config::{Config, VERSION};
use crate::presign::sigv4::{S3Presigner, SigningError};
use crate::presign::PRESIGN_PATH;

/// State shared by all handlers
#[derive(Clone)]
pub struct ServerState {
    /// Presigner, or the reason it could not be built (reported per request)
    pub presigner: Result<Arc<S3Presigner>, SigningError>,
}

impl ServerState {
    pub fn from_config(config: &Config) -> Self {
        let presigner = S3Presigner::from_config(&config.storage).map(Arc::new);
        match &presigner {
            Ok(p) => tracing::info!(
                "Presigning for bucket '{}' ({}s expiry)",
                p.bucket(),
                p.expires_secs()
            ),
            Err(e) => tracing::warn!("Storage not configured, presign requests will fail: {}", e),
        }
        Self { presigner }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: VERSION,
    })
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route(PRESIGN_PATH, any(presigned_url))
        .route("/health", get(health))
        .with_state(state)
}

/// Start the presign server
pub async fn start_server(
    config: Config,
    shutdown_rx: tokio::sync::oneshot::Receiver<()>,
) -> Result<()> {
    let bind_addr = config.bind_addr;
    let app = router(ServerState::from_config(&config));

    let listener = TcpListener::bind(bind_addr)
        .await
        .context("Failed to bind to address")?;

    tracing::info!("Presign server listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_rx.await.ok();
        })
        .await
        .context("Server error")?;

    tracing::info!("Presign server shut down gracefully");
    Ok(())
}
