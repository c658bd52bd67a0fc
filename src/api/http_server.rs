// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::handlers::health_handler;
use super::ocr::scan_handler;
use super::validate::validate_handler;
use crate::config::ServerConfig;
use crate::credentials::{CredentialStore, CredentialValidator};
use crate::vision::{OcrModelManager, TextRecognizer, MAX_IMAGE_SIZE};

/// Shared, read-only state handed to every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub validator: CredentialValidator,
    pub ocr: Arc<OcrModelManager>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(store: CredentialStore, ocr: OcrModelManager, max_upload_bytes: usize) -> Self {
        Self {
            validator: CredentialValidator::new(Arc::new(store)),
            ocr: Arc::new(ocr),
            max_upload_bytes,
        }
    }

    /// Built-in credentials, OCR disabled
    pub fn new_for_test() -> Self {
        Self::new(
            CredentialStore::builtin(),
            OcrModelManager::disabled(),
            MAX_IMAGE_SIZE,
        )
    }

    pub fn with_recognizer(mut self, recognizer: Arc<dyn TextRecognizer>) -> Self {
        self.ocr = Arc::new(OcrModelManager::with_recognizer(recognizer));
        self
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }
}

/// Room left for multipart boundaries and part headers on top of the image
pub const MULTIPART_HEADROOM: usize = 64 * 1024;

/// Request body cap for an image cap; the image itself is checked on decode
pub fn body_limit(max_upload_bytes: usize) -> usize {
    max_upload_bytes.saturating_add(MULTIPART_HEADROOM)
}

/// Build the router with all `/api` routes
pub fn create_app(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/health", get(health_handler))
        .route("/ocr", post(scan_handler))
        .route("/validate", post(validate_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    Router::new()
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(body_limit(state.max_upload_bytes)))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the listener and serve until Ctrl-C or SIGTERM
pub async fn start_server(config: &ServerConfig, state: AppState) -> Result<()> {
    let addr = config.socket_addr()?;
    let app = create_app(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("🚀 API server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("⏹️  Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}
