// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision processing for card scans
//!
//! This module provides:
//! - Decoding of uploaded images
//! - Fixed enhancement (grayscale, CLAHE, threshold, closing)
//! - OCR via PaddleOCR (English and Arabic)
//! - Numeric token extraction from recognized text
//!
//! Everything runs on CPU.

pub mod enhance;
pub mod image_utils;
pub mod model_manager;
pub mod numbers;
pub mod ocr;

pub use enhance::{enhance_image, try_enhance, EnhanceError};
pub use image_utils::{decode_image_bytes, detect_format, ImageError, ImageInfo, MAX_IMAGE_SIZE};
pub use model_manager::{OcrModelConfig, OcrModelManager, DEFAULT_OCR_MODEL_DIR};
pub use numbers::{extract_numbers, join_fragments};
pub use ocr::{OcrLanguage, TextRecognizer};
