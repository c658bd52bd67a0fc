// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! PaddleOCR text detection model
//!
//! Finds text regions in an enhanced scan and returns bounding boxes in
//! preprocessed (640x640) space.

use anyhow::Result;
use ndarray::{Array2, ArrayView2, ArrayViewD, Axis, Ix2};
use std::collections::VecDeque;
use std::path::Path;
use tracing::{debug, info};

use super::preprocessing::{detection_tensor, Letterbox};
use super::session::OnnxModel;

/// Default probability threshold for text pixels
pub const DEFAULT_BOX_THRESHOLD: f32 = 0.3;

/// Regions with fewer pixels are treated as noise
pub const MIN_REGION_PIXELS: usize = 10;

/// Fraction of the box height added on every side, since the DB map
/// shrinks text kernels
pub const UNCLIP_RATIO: f32 = 0.3;

/// A detected text box with location and confidence
#[derive(Debug, Clone, PartialEq)]
pub struct TextBox {
    /// X coordinate of top-left corner (in preprocessed image space)
    pub x: f32,
    /// Y coordinate of top-left corner (in preprocessed image space)
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Mean text probability over the region (0.0-1.0)
    pub confidence: f32,
}

impl TextBox {
    /// Grow the box by `ratio` of its height on every side, clamped to
    /// `0..limit`
    pub fn expanded(&self, ratio: f32, limit: f32) -> Self {
        let pad = self.height * ratio;
        let x0 = (self.x - pad).max(0.0);
        let y0 = (self.y - pad).max(0.0);
        let x1 = (self.x + self.width + pad).min(limit);
        let y1 = (self.y + self.height + pad).min(limit);

        Self {
            x: x0,
            y: y0,
            width: (x1 - x0).max(0.0),
            height: (y1 - y0).max(0.0),
            confidence: self.confidence,
        }
    }
}

/// PaddleOCR text detection model (CPU only)
#[derive(Debug, Clone)]
pub struct OcrDetectionModel {
    model: OnnxModel,
}

impl OcrDetectionModel {
    /// Load the detection model (`det_model.onnx`)
    pub fn new<P: AsRef<Path>>(model_path: P, intra_threads: usize) -> Result<Self> {
        let model_path = model_path.as_ref();
        info!("Loading OCR detection model from {}", model_path.display());

        let model = OnnxModel::load(model_path, intra_threads, "x", "sigmoid_0.tmp_0")?;

        info!("✅ OCR detection model loaded (CPU-only)");

        Ok(Self { model })
    }

    /// Detect text regions
    ///
    /// Boxes are in detection space, top-to-bottom then left-to-right; the
    /// returned letterbox maps them back onto `image`.
    pub fn detect(&self, image: &image::DynamicImage) -> Result<(Vec<TextBox>, Letterbox)> {
        let (input, letterbox) = detection_tensor(image);
        let output = self.model.run(&input)?;

        let shape = input.shape();
        let boxes = boxes_from_probability_map(output.view(), shape[2], shape[3], DEFAULT_BOX_THRESHOLD)?;

        debug!("Detected {} text regions", boxes.len());
        Ok((boxes, letterbox))
    }
}

/// Turn a DB probability map (`[1, 1, H, W]` or `[1, H, W]`) into boxes in
/// input-image space via 4-connected components
pub fn boxes_from_probability_map(
    output: ArrayViewD<f32>,
    input_height: usize,
    input_width: usize,
    threshold: f32,
) -> Result<Vec<TextBox>> {
    let map = probability_plane(output)?;
    let (rows, cols) = map.dim();
    if rows == 0 || cols == 0 {
        return Ok(Vec::new());
    }

    let sx = input_width as f32 / cols as f32;
    let sy = input_height as f32 / rows as f32;

    let mut seen = Array2::<bool>::from_elem((rows, cols), false);
    let mut boxes: Vec<TextBox> = Vec::new();

    for ((row, col), &p) in map.indexed_iter() {
        if p < threshold || seen[[row, col]] {
            continue;
        }
        let blob = Blob::grow(&map, &mut seen, (row, col), threshold);
        if blob.pixels >= MIN_REGION_PIXELS {
            boxes.push(blob.to_box(sx, sy));
        }
    }

    boxes.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));
    Ok(boxes)
}

/// The `H x W` plane of a detection output
fn probability_plane(output: ArrayViewD<f32>) -> Result<ArrayView2<f32>> {
    let plane = match output.ndim() {
        4 => output.index_axis_move(Axis(0), 0).index_axis_move(Axis(0), 0),
        3 => output.index_axis_move(Axis(0), 0),
        _ => anyhow::bail!("Unexpected detection output shape: {:?}", output.shape()),
    };
    Ok(plane.into_dimensionality::<Ix2>()?)
}

/// Bounds and score mass of one connected component
struct Blob {
    top: usize,
    left: usize,
    bottom: usize,
    right: usize,
    pixels: usize,
    mass: f32,
}

impl Blob {
    fn grow(
        map: &ArrayView2<f32>,
        seen: &mut Array2<bool>,
        seed: (usize, usize),
        threshold: f32,
    ) -> Self {
        let (rows, cols) = map.dim();
        let mut blob = Blob {
            top: seed.0,
            left: seed.1,
            bottom: seed.0,
            right: seed.1,
            pixels: 0,
            mass: 0.0,
        };

        seen[seed] = true;
        let mut queue = VecDeque::from([seed]);
        while let Some((row, col)) = queue.pop_front() {
            blob.include(row, col, map[[row, col]]);

            let neighbours = [
                (row.wrapping_sub(1), col),
                (row + 1, col),
                (row, col.wrapping_sub(1)),
                (row, col + 1),
            ];
            for (r, c) in neighbours {
                if r < rows && c < cols && !seen[[r, c]] && map[[r, c]] >= threshold {
                    seen[[r, c]] = true;
                    queue.push_back((r, c));
                }
            }
        }
        blob
    }

    fn include(&mut self, row: usize, col: usize, p: f32) {
        self.top = self.top.min(row);
        self.bottom = self.bottom.max(row);
        self.left = self.left.min(col);
        self.right = self.right.max(col);
        self.pixels += 1;
        self.mass += p;
    }

    fn to_box(&self, sx: f32, sy: f32) -> TextBox {
        TextBox {
            x: self.left as f32 * sx,
            y: self.top as f32 * sy,
            width: (self.right - self.left + 1) as f32 * sx,
            height: (self.bottom - self.top + 1) as f32 * sy,
            confidence: self.mass / self.pixels as f32,
        }
    }
}
