// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Multipart upload parsing for card scans

use axum::body::Bytes;
use axum_extra::extract::Multipart;
use tracing::warn;

use crate::api::errors::ApiError;

/// Name of the multipart field carrying the image
pub const IMAGE_FIELD: &str = "image";

/// No `image` file part in the form
pub const NO_IMAGE_MESSAGE: &str = "لا توجد صورة";

/// `image` part present but its filename is empty
pub const EMPTY_FILE_MESSAGE: &str = "الملف فارغ";

/// The uploaded image file
#[derive(Debug, Clone)]
pub struct ScanUpload {
    pub filename: String,
    pub bytes: Bytes,
}

impl ScanUpload {
    /// Pull the first `image` file part out of a multipart form
    ///
    /// Parts without a filename are plain form values, not files, and are
    /// skipped.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        loop {
            let field = multipart.next_field().await.map_err(|e| {
                warn!("Malformed multipart body: {}", e.body_text());
                ApiError::InvalidRequest(e.body_text())
            })?;

            let Some(field) = field else {
                return Err(ApiError::InvalidRequest(NO_IMAGE_MESSAGE.to_string()));
            };

            if field.name() != Some(IMAGE_FIELD) {
                continue;
            }
            let Some(filename) = field.file_name().map(str::to_string) else {
                continue;
            };
            if filename.is_empty() {
                return Err(ApiError::InvalidRequest(EMPTY_FILE_MESSAGE.to_string()));
            }

            let bytes = field.bytes().await.map_err(|e| {
                warn!("Failed to read upload '{}': {}", filename, e.body_text());
                ApiError::InvalidRequest(e.body_text())
            })?;

            return Ok(Self { filename, bytes });
        }
    }
}
