// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Card scan endpoint handler

use anyhow::Result;
use axum::{extract::State, Json};
use axum_extra::extract::multipart::{Multipart, MultipartRejection};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::request::{ScanUpload, NO_IMAGE_MESSAGE};
use super::response::ScanResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::credentials::{CredentialValidator, SCAN_MESSAGES};
use crate::vision::{decode_image_bytes, enhance_image, extract_numbers, join_fragments, OcrModelManager};

/// Characters of recognized text written to the log
const RAW_TEXT_LOG_CHARS: usize = 100;

/// POST /api/ocr - Read a card number and PIN from an uploaded photo
///
/// # Request
/// Multipart form with an `image` file part.
///
/// # Response
/// - `success`, `valid`: whether the pair is on the allow-list
/// - `card`, `pin`: first and second numbers read, or `null`
/// - `message`: user-facing result text
///
/// Fewer than two numbers is still a 200, with `success: false`.
///
/// # Errors
/// - 400 Bad Request: no `image` file part, or its filename is empty
/// - 500 Internal Server Error: decoding or recognition failed
pub async fn scan_handler(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ScanResponse>, ApiError> {
    let multipart = multipart.map_err(|e| {
        warn!("Scan request is not multipart: {}", e);
        ApiError::InvalidRequest(NO_IMAGE_MESSAGE.to_string())
    })?;

    let upload = ScanUpload::from_multipart(multipart).await?;
    debug!(
        "Scan upload '{}' ({} bytes)",
        upload.filename,
        upload.bytes.len()
    );

    let ocr = state.ocr.clone();
    let max_size = state.max_upload_bytes;
    let raw_text = tokio::task::spawn_blocking(move || read_text(&upload.bytes, max_size, &ocr))
        .await
        .map_err(|e| {
            error!("❌ Scan task failed: {}", e);
            ApiError::ScanFailed(e.to_string())
        })?
        .map_err(|e| {
            error!("❌ Scan failed: {:#}", e);
            ApiError::ScanFailed(e.to_string())
        })?;

    let preview: String = raw_text.chars().take(RAW_TEXT_LOG_CHARS).collect();
    info!("📝 Raw text: {}", preview);

    let numbers = extract_numbers(&raw_text);
    info!("🔢 Numbers: {:?}", numbers);

    Ok(Json(scan_result(&state.validator, &numbers)))
}

/// Decode, enhance and recognize; returns the fragments joined by spaces
///
/// Runs on the blocking pool.
pub fn read_text(bytes: &[u8], max_size: usize, ocr: &OcrModelManager) -> Result<String> {
    let (image, info) = decode_image_bytes(bytes, max_size)?;
    info!(
        "📷 New image: {}x{}x{} ({:?}, {} bytes)",
        info.width, info.height, info.channels, info.format, info.size_bytes
    );

    let enhanced = enhance_image(&image);
    let fragments = ocr.read_text(&enhanced)?;

    Ok(join_fragments(&fragments))
}

/// First number is the card, second the PIN; later numbers are ignored
pub fn scan_result(validator: &CredentialValidator, numbers: &[String]) -> ScanResponse {
    match numbers {
        [card, pin, ..] => validator.validate(card, pin, SCAN_MESSAGES).into(),
        _ => ScanResponse::not_recognized(),
    }
}
