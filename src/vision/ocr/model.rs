// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! PaddleOCR pipeline: detection, per-region crop, multi-language recognition

use anyhow::Result;
use image::DynamicImage;
use std::time::Instant;
use tracing::debug;

use super::detection::{OcrDetectionModel, TextBox, UNCLIP_RATIO};
use super::language::OcrLanguage;
use super::preprocessing::{Letterbox, OCR_INPUT_SIZE};
use super::recognition::{OcrRecognitionModel, RecognizedText};
use crate::vision::model_manager::OcrModelConfig;

/// Converts pixels into recognized text fragments
pub trait TextRecognizer: Send + Sync {
    /// Recognize text in an enhanced scan, one string per detected region
    fn recognize(&self, image: &DynamicImage) -> Result<Vec<String>>;

    /// Languages this recognizer reads
    fn languages(&self) -> Vec<OcrLanguage>;
}

/// Bounding box for detected text, in original image pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// A recognized text region
#[derive(Debug, Clone)]
pub struct TextRegion {
    pub text: String,
    /// Confidence score (0.0-1.0)
    pub confidence: f32,
    pub language: OcrLanguage,
    pub bounding_box: BoundingBox,
}

/// PaddleOCR model for text extraction
///
/// One shared detection model plus one recognition model per language.
/// Every detected region is read by each language model and the most
/// confident non-empty reading is kept.
#[derive(Debug)]
pub struct PaddleOcrModel {
    detection: OcrDetectionModel,
    recognizers: Vec<OcrRecognitionModel>,
}

impl PaddleOcrModel {
    /// Load all models described by `config`
    ///
    /// Fails if the detection model or any language's recognition model
    /// cannot be loaded.
    pub fn load(config: &OcrModelConfig) -> Result<Self> {
        if config.languages.is_empty() {
            anyhow::bail!("No OCR languages configured");
        }

        let detection = OcrDetectionModel::new(config.det_model_path(), config.intra_threads)?;

        let recognizers = config
            .languages
            .iter()
            .map(|&language| {
                OcrRecognitionModel::new(
                    language,
                    config.rec_model_path(language),
                    config.dict_path(language),
                    config.intra_threads,
                )
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            detection,
            recognizers,
        })
    }

    /// Read every detected region, top-to-bottom then left-to-right
    pub fn process(&self, image: &DynamicImage) -> Result<Vec<TextRegion>> {
        let start = Instant::now();
        let (boxes, letterbox) = self.detection.detect(image)?;
        let mut regions = Vec::with_capacity(boxes.len());

        for text_box in &boxes {
            let Some(bbox) = map_box_to_original(text_box, &letterbox) else {
                continue;
            };
            let crop = image.crop_imm(bbox.x, bbox.y, bbox.width, bbox.height);

            let readings = self
                .recognizers
                .iter()
                .map(|r| r.recognize(&crop).map(|text| (r.language(), text)))
                .collect::<Result<Vec<_>>>()?;

            if let Some((language, best)) = best_reading(readings) {
                debug!(
                    "Region {:?} [{}] {:.2}: {}",
                    bbox, language, best.confidence, best.text
                );
                regions.push(TextRegion {
                    text: best.text,
                    confidence: best.confidence,
                    language,
                    bounding_box: bbox,
                });
            }
        }

        debug!(
            "OCR: {} boxes, {} regions, {}ms",
            boxes.len(),
            regions.len(),
            start.elapsed().as_millis()
        );
        Ok(regions)
    }
}

impl TextRecognizer for PaddleOcrModel {
    fn recognize(&self, image: &DynamicImage) -> Result<Vec<String>> {
        Ok(self.process(image)?.into_iter().map(|r| r.text).collect())
    }

    fn languages(&self) -> Vec<OcrLanguage> {
        self.recognizers.iter().map(|r| r.language()).collect()
    }
}

/// Expand a detected box and map it from detection space onto the original
/// image. Returns `None` when nothing of the box lies inside the image.
pub fn map_box_to_original(text_box: &TextBox, letterbox: &Letterbox) -> Option<BoundingBox> {
    let grown = text_box.expanded(UNCLIP_RATIO, OCR_INPUT_SIZE as f32);

    let (x0, y0) = letterbox.to_source(grown.x, grown.y);
    let (x1, y1) = letterbox.to_source(grown.x + grown.width, grown.y + grown.height);

    let max_w = letterbox.source_width as f32;
    let max_h = letterbox.source_height as f32;
    let x0 = x0.clamp(0.0, max_w).floor() as u32;
    let y0 = y0.clamp(0.0, max_h).floor() as u32;
    let x1 = x1.clamp(0.0, max_w).ceil() as u32;
    let y1 = y1.clamp(0.0, max_h).ceil() as u32;

    if x1 <= x0 || y1 <= y0 {
        return None;
    }

    Some(BoundingBox {
        x: x0,
        y: y0,
        width: x1 - x0,
        height: y1 - y0,
    })
}

/// Most confident non-empty reading; earlier languages win ties
pub fn best_reading(
    readings: Vec<(OcrLanguage, RecognizedText)>,
) -> Option<(OcrLanguage, RecognizedText)> {
    readings
        .into_iter()
        .filter(|(_, r)| !r.is_empty())
        .fold(None, |best, candidate| match best {
            Some(b) if b.1.confidence >= candidate.1.confidence => Some(b),
            _ => Some(candidate),
        })
}
