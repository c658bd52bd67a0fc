// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Direct credential check handler

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    Json,
};
use std::sync::Arc;
use tracing::{debug, warn};

use super::request::{is_json_content_type, ValidateRequest};
use super::response::ValidateResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::credentials::LOGIN_MESSAGES;

/// POST /api/validate - Check a typed-in card/PIN pair
///
/// Body: `{"card": "...", "pin": "..."}` sent as `application/json`; both
/// fields optional. Any failure, including a missing JSON content type or a
/// malformed body, is a 500 with `{error}`.
pub async fn validate_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ValidateResponse>, ApiError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    if !is_json_content_type(content_type) {
        warn!("Validate request with content type {:?}", content_type);
        return Err(ApiError::InternalError(
            "Request body must be application/json".to_string(),
        ));
    }

    let request = ValidateRequest::from_body(&body).map_err(|e| {
        warn!("Validate request rejected: {}", e);
        e
    })?;

    let outcome = state
        .validator
        .validate(&request.card, &request.pin, LOGIN_MESSAGES);
    debug!("Validate card '{}': {}", request.card, outcome.is_valid);

    Ok(Json(outcome.into()))
}
