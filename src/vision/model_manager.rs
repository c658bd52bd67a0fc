// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! OCR model manager: builds the recognition engine once at startup

use image::DynamicImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::vision::ocr::{OcrLanguage, PaddleOcrModel, TextRecognizer};

/// Default location of the PaddleOCR ONNX models
pub const DEFAULT_OCR_MODEL_DIR: &str = "./models/paddleocr-onnx";

/// Configuration for loading the OCR models
///
/// Expected layout under `model_dir`:
/// - `det_model.onnx` (text detection, shared)
/// - `<lang>/rec_model.onnx` (text recognition)
/// - `<lang>/dict.txt` (character dictionary)
#[derive(Debug, Clone)]
pub struct OcrModelConfig {
    pub model_dir: PathBuf,
    pub languages: Vec<OcrLanguage>,
    /// ONNX Runtime intra-op threads per session
    pub intra_threads: usize,
}

impl Default for OcrModelConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from(DEFAULT_OCR_MODEL_DIR),
            languages: OcrLanguage::ALL.to_vec(),
            intra_threads: 4,
        }
    }
}

impl OcrModelConfig {
    pub fn new(model_dir: impl AsRef<Path>, intra_threads: usize) -> Self {
        Self {
            model_dir: model_dir.as_ref().to_path_buf(),
            intra_threads,
            ..Default::default()
        }
    }

    pub fn det_model_path(&self) -> PathBuf {
        self.model_dir.join("det_model.onnx")
    }

    pub fn rec_model_path(&self, language: OcrLanguage) -> PathBuf {
        self.model_dir.join(language.code()).join("rec_model.onnx")
    }

    pub fn dict_path(&self, language: OcrLanguage) -> PathBuf {
        self.model_dir.join(language.code()).join("dict.txt")
    }
}

/// Holds the recognition engine, if one could be built
///
/// The engine is constructed exactly once. If construction fails the failure
/// is logged and OCR stays disabled for the life of the process: every call
/// to [`OcrModelManager::read_text`] then yields no text.
#[derive(Clone, Default)]
pub struct OcrModelManager {
    recognizer: Option<Arc<dyn TextRecognizer>>,
}

impl std::fmt::Debug for OcrModelManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OcrModelManager")
            .field("ocr_loaded", &self.has_ocr())
            .finish()
    }
}

impl OcrModelManager {
    /// Load the PaddleOCR engine described by `config`
    pub fn new(config: &OcrModelConfig) -> Self {
        match PaddleOcrModel::load(config) {
            Ok(model) => {
                tracing::info!(
                    "✅ OCR engine loaded from {} ({:?})",
                    config.model_dir.display(),
                    model.languages()
                );
                Self::with_recognizer(Arc::new(model))
            }
            Err(e) => {
                tracing::error!(
                    "✗ Failed to load OCR engine from {}: {:#}",
                    config.model_dir.display(),
                    e
                );
                Self::disabled()
            }
        }
    }

    /// Use an already-built recognizer
    pub fn with_recognizer(recognizer: Arc<dyn TextRecognizer>) -> Self {
        Self {
            recognizer: Some(recognizer),
        }
    }

    /// No recognition engine; all reads return nothing
    pub fn disabled() -> Self {
        Self { recognizer: None }
    }

    pub fn has_ocr(&self) -> bool {
        self.recognizer.is_some()
    }

    /// Recognize text fragments, or none when OCR is disabled
    pub fn read_text(&self, image: &DynamicImage) -> anyhow::Result<Vec<String>> {
        match &self.recognizer {
            Some(recognizer) => recognizer.recognize(image),
            None => Ok(Vec::new()),
        }
    }
}
