// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use cardscan::{
    api::start_server,
    config::ServerConfig,
    credentials::CredentialStore,
    version,
    vision::OcrModelManager,
    AppState,
};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::parse();
    config.validate()?;

    info!("🚀 Starting {}", version::get_version_string());
    info!(
        "📂 OCR models: {} ({} threads, languages {:?})",
        config.ocr_model_dir.display(),
        config.ocr_threads,
        version::OCR_LANGUAGES
    );

    // Model loading is CPU-bound; finish it before accepting traffic
    let ocr_config = config.ocr_model_config();
    let ocr = tokio::task::spawn_blocking(move || OcrModelManager::new(&ocr_config)).await?;
    if !ocr.has_ocr() {
        tracing::warn!("⚠️  OCR disabled: scans will not recognize any numbers");
    }

    let store = CredentialStore::builtin();
    info!("🔐 Loaded {} credential records", store.len());

    let state = AppState::new(store, ocr, config.max_upload_bytes);
    start_server(&config, state).await
}
