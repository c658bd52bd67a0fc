// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Tensor preparation for PaddleOCR models
//!
//! Scans arrive here already enhanced: single-channel, black text on white.
//! The detection letterbox is therefore padded with white so the border
//! reads as background, not as a gray band the detector might pick up.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use ndarray::Array4;

/// Side of the square detection input
pub const OCR_INPUT_SIZE: u32 = 640;

/// Recognition input height (PP-OCR recognition models use 48)
pub const REC_INPUT_HEIGHT: u32 = 48;

pub const REC_MAX_WIDTH: u32 = 320;
pub const REC_MIN_WIDTH: u32 = 4;

/// ImageNet channel means, used by the detector
pub const MEAN: [f32; 3] = [0.485, 0.456, 0.406];

/// ImageNet channel standard deviations, used by the detector
pub const STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Recognition models take pixels scaled to `[-1, 1]`
pub const REC_MEAN: [f32; 3] = [0.5; 3];
pub const REC_STD: [f32; 3] = [0.5; 3];

const PAD: Rgb<u8> = Rgb([255, 255, 255]);

/// Where a scan sits inside the square detection input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    pub scale: f32,
    pub offset_x: u32,
    pub offset_y: u32,
    /// Placed size after scaling
    pub width: u32,
    pub height: u32,
    pub source_width: u32,
    pub source_height: u32,
}

impl Letterbox {
    /// Fit a `source_width` x `source_height` image into a `side` square,
    /// centred. An empty source maps to an empty placement.
    pub fn fit(source_width: u32, source_height: u32, side: u32) -> Self {
        if source_width == 0 || source_height == 0 {
            return Self {
                scale: 1.0,
                offset_x: 0,
                offset_y: 0,
                width: 0,
                height: 0,
                source_width,
                source_height,
            };
        }

        let scale = (side as f32 / source_width as f32).min(side as f32 / source_height as f32);
        let width = ((source_width as f32 * scale).round() as u32).clamp(1, side);
        let height = ((source_height as f32 * scale).round() as u32).clamp(1, side);

        Self {
            scale,
            offset_x: (side - width) / 2,
            offset_y: (side - height) / 2,
            width,
            height,
            source_width,
            source_height,
        }
    }

    pub fn for_image(image: &DynamicImage) -> Self {
        let (w, h) = image.dimensions();
        Self::fit(w, h, OCR_INPUT_SIZE)
    }

    /// Detection-space point to source-image point (unclamped)
    pub fn to_source(&self, x: f32, y: f32) -> (f32, f32) {
        (
            (x - self.offset_x as f32) / self.scale,
            (y - self.offset_y as f32) / self.scale,
        )
    }
}

/// Scale the scan into a white `OCR_INPUT_SIZE` square
pub fn letterboxed(image: &DynamicImage, letterbox: &Letterbox) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(OCR_INPUT_SIZE, OCR_INPUT_SIZE, PAD);
    if letterbox.width == 0 || letterbox.height == 0 {
        return canvas;
    }

    let placed = image
        .resize_exact(letterbox.width, letterbox.height, FilterType::Triangle)
        .to_rgb8();
    imageops::replace(
        &mut canvas,
        &placed,
        letterbox.offset_x as i64,
        letterbox.offset_y as i64,
    );
    canvas
}

/// `[1, 3, 640, 640]` detection tensor plus the letterbox used to build it
pub fn detection_tensor(image: &DynamicImage) -> (Array4<f32>, Letterbox) {
    let letterbox = Letterbox::for_image(image);
    let canvas = letterboxed(image, &letterbox);
    (normalize(&canvas, MEAN, STD), letterbox)
}

/// `[1, 3, 48, W]` tensor for one cropped region
///
/// Width follows the aspect ratio, clamped to `REC_MIN_WIDTH..=REC_MAX_WIDTH`.
pub fn recognition_tensor(region: &DynamicImage) -> Array4<f32> {
    let (w, h) = region.dimensions();
    let scaled = (w as f32 * REC_INPUT_HEIGHT as f32 / h.max(1) as f32).round() as u32;
    let width = scaled.clamp(REC_MIN_WIDTH, REC_MAX_WIDTH);

    let line = region
        .resize_exact(width, REC_INPUT_HEIGHT, FilterType::Triangle)
        .to_rgb8();
    normalize(&line, REC_MEAN, REC_STD)
}

/// RGB pixels to a per-channel normalized NCHW tensor
pub fn normalize(rgb: &RgbImage, mean: [f32; 3], std: [f32; 3]) -> Array4<f32> {
    let (w, h) = rgb.dimensions();
    Array4::from_shape_fn((1, 3, h as usize, w as usize), |(_, c, y, x)| {
        let v = rgb.get_pixel(x as u32, y as u32)[c] as f32 / 255.0;
        (v - mean[c]) / std[c]
    })
}
