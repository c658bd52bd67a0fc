// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! PaddleOCR integration for text extraction from scans
//!
//! CPU-only OCR using PaddleOCR ONNX models.
//!
//! Components:
//! - `detection` - Text region detection
//! - `recognition` - Per-language text recognition with CTC decoding
//! - `preprocessing` - Tensor preparation for both models
//! - `session` - ONNX Runtime session loading
//! - `model` - Combined pipeline behind the `TextRecognizer` trait

pub mod detection;
pub mod language;
pub mod model;
pub mod preprocessing;
pub mod recognition;
pub mod session;

pub use detection::{OcrDetectionModel, TextBox};
pub use language::OcrLanguage;
pub use model::{BoundingBox, PaddleOcrModel, TextRecognizer, TextRegion};
pub use recognition::{OcrRecognitionModel, RecognizedText};
