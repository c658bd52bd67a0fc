// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! PaddleOCR text recognition model
//!
//! Recognizes the text content of a cropped region. One model is loaded per
//! language, each with its own character dictionary.

use anyhow::{Context, Result};
use image::DynamicImage;
use ndarray::{ArrayViewD, Axis, Ix2};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use super::language::OcrLanguage;
use super::preprocessing::recognition_tensor;
use super::session::OnnxModel;

/// CTC blank label index
const BLANK: usize = 0;

/// Recognized text with confidence score
#[derive(Debug, Clone, PartialEq)]
pub struct RecognizedText {
    /// The recognized text content
    pub text: String,
    /// Mean per-character probability (0.0-1.0)
    pub confidence: f32,
}

impl RecognizedText {
    pub fn new(text: String, confidence: f32) -> Self {
        Self { text, confidence }
    }

    /// Check if the text is empty or whitespace only
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// PaddleOCR text recognition model for a single language (CPU only)
#[derive(Debug, Clone)]
pub struct OcrRecognitionModel {
    language: OcrLanguage,
    model: OnnxModel,
    /// CTC labels: index 0 is the blank token, the last entry is a space
    dictionary: Arc<Vec<String>>,
}

impl OcrRecognitionModel {
    /// Load a recognition model and its character dictionary
    ///
    /// # Errors
    /// Returns error if either file is missing or ONNX Runtime fails to load
    /// the model.
    pub fn new<P: AsRef<Path>>(
        language: OcrLanguage,
        model_path: P,
        dict_path: P,
        intra_threads: usize,
    ) -> Result<Self> {
        let model_path = model_path.as_ref();
        let dict_path = dict_path.as_ref();

        if !dict_path.is_file() {
            anyhow::bail!("Character dictionary not found: {}", dict_path.display());
        }

        info!(
            "Loading {} recognition model from {}",
            language,
            model_path.display()
        );

        let dictionary = load_dictionary(dict_path)?;
        let model = OnnxModel::load(model_path, intra_threads, "x", "softmax_0.tmp_0")?;

        info!(
            "✅ {} recognition model loaded ({} labels)",
            language,
            dictionary.len()
        );

        Ok(Self {
            language,
            model,
            dictionary: Arc::new(dictionary),
        })
    }

    pub fn language(&self) -> OcrLanguage {
        self.language
    }

    /// Recognize the text in a cropped region
    pub fn recognize(&self, region: &DynamicImage) -> Result<RecognizedText> {
        let input = recognition_tensor(region);
        let output = self.model.run(&input)?;
        let (text, confidence) = ctc_greedy_decode(output.view(), &self.dictionary)?;
        Ok(RecognizedText::new(text, confidence))
    }
}

/// Read a PaddleOCR dictionary: one label per line, blank prepended and a
/// space appended
pub fn load_dictionary<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to open dictionary: {}", path.display()))?;

    let labels = raw.lines().map(|l| l.trim_end_matches('\r')).filter(|l| !l.is_empty());
    Ok(std::iter::once("")
        .chain(labels)
        .chain(std::iter::once(" "))
        .map(str::to_string)
        .collect())
}

/// Greedy CTC decode of `[batch, steps, classes]` or `[steps, classes]`
/// scores: best class per step, repeats collapsed, blanks (class 0) dropped.
/// Confidence is the mean score of the emitted labels.
pub fn ctc_greedy_decode(output: ArrayViewD<f32>, dictionary: &[String]) -> Result<(String, f32)> {
    let steps = match output.ndim() {
        3 => output.index_axis_move(Axis(0), 0),
        2 => output,
        _ => anyhow::bail!("Unexpected recognition output shape: {:?}", output.shape()),
    }
    .into_dimensionality::<Ix2>()?;

    let mut text = String::new();
    let mut scores = Vec::new();
    let mut last = BLANK;

    for row in steps.rows() {
        let (class, score) = row
            .iter()
            .copied()
            .enumerate()
            .fold((BLANK, f32::NEG_INFINITY), |best, (i, p)| if p > best.1 { (i, p) } else { best });

        if class != BLANK && class != last {
            if let Some(label) = dictionary.get(class) {
                text.push_str(label);
                scores.push(score);
            }
        }
        last = class;
    }

    let confidence = if scores.is_empty() {
        0.0
    } else {
        (scores.iter().sum::<f32>() / scores.len() as f32).clamp(0.0, 1.0)
    };
    Ok((text.trim().to_string(), confidence))
}
