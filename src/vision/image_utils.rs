// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Decoding of uploaded scans

use image::{DynamicImage, ImageFormat};
use thiserror::Error;

/// Default maximum upload size (10MB)
pub const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024;

/// Formats a scan may arrive in
const ACCEPTED_FORMATS: [ImageFormat; 6] = [
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::WebP,
    ImageFormat::Gif,
    ImageFormat::Bmp,
    ImageFormat::Tiff,
];

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Image data is too large: {0} bytes (max: {1} bytes)")]
    TooLarge(usize, usize),

    #[error("Unsupported image format")]
    UnsupportedFormat,

    #[error("Failed to decode image: {0}")]
    DecodeFailed(String),

    #[error("Image data is empty")]
    EmptyData,
}

/// What the upload turned out to be
#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
    /// Channels of the decoded color type (1 gray, 3 RGB, 4 RGBA, ...)
    pub channels: u8,
    pub size_bytes: usize,
}

/// Decode an uploaded payload of at most `max_size` bytes
pub fn decode_image_bytes(
    bytes: &[u8],
    max_size: usize,
) -> Result<(DynamicImage, ImageInfo), ImageError> {
    match bytes.len() {
        0 => return Err(ImageError::EmptyData),
        n if n > max_size => return Err(ImageError::TooLarge(n, max_size)),
        _ => {}
    }

    let format = detect_format(bytes)?;
    let image = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| ImageError::DecodeFailed(e.to_string()))?;

    let info = ImageInfo {
        width: image.width(),
        height: image.height(),
        format,
        channels: image.color().channel_count(),
        size_bytes: bytes.len(),
    };
    Ok((image, info))
}

/// Sniff the container format from the leading bytes
pub fn detect_format(bytes: &[u8]) -> Result<ImageFormat, ImageError> {
    image::guess_format(bytes)
        .ok()
        .filter(|format| ACCEPTED_FORMATS.contains(format))
        .ok_or(ImageError::UnsupportedFormat)
}
