// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::http_server::AppState;
use crate::version::VERSION;

pub const OCR_READY: &str = "ready";
pub const OCR_NOT_LOADED: &str = "not-loaded";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub ocr: String,
    pub version: String,
}

impl HealthResponse {
    pub fn new(ocr_loaded: bool) -> Self {
        Self {
            status: "active".to_string(),
            ocr: if ocr_loaded { OCR_READY } else { OCR_NOT_LOADED }.to_string(),
            version: VERSION.to_string(),
        }
    }
}

/// GET /api/health - always 200
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse::new(state.ocr.has_ocr()))
}
