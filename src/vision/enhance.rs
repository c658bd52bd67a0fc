// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Scan enhancement before text recognition
//!
//! Fixed pipeline, no configuration:
//! 1. Grayscale (BT.601 luma)
//! 2. CLAHE, clip limit 2.0 over an 8x8 tile grid
//! 3. Binary threshold at 150
//! 4. Morphological closing with a 3x3 rectangle

use image::{DynamicImage, GenericImageView, GrayImage, Luma};
use thiserror::Error;
use tracing::{debug, warn};

/// CLAHE contrast limit (relative to a uniform histogram)
pub const CLAHE_CLIP_LIMIT: f32 = 2.0;

/// CLAHE tiles per axis
pub const CLAHE_TILE_GRID: u32 = 8;

/// Pixels strictly above this become white, all others black
pub const BINARY_THRESHOLD: u8 = 150;

/// Side of the square structuring element used for closing
pub const CLOSE_KERNEL_SIZE: u32 = 3;

const HIST_BINS: usize = 256;

#[derive(Debug, Error)]
pub enum EnhanceError {
    #[error("Image has no pixels ({0}x{1})")]
    EmptyImage(u32, u32),

    #[error("Invalid CLAHE tile grid: {0}")]
    InvalidTileGrid(u32),
}

/// Enhance a decoded scan for recognition.
///
/// Never fails: on any internal error the original image is returned
/// unchanged and the error is logged.
pub fn enhance_image(image: &DynamicImage) -> DynamicImage {
    match try_enhance(image) {
        Ok(enhanced) => DynamicImage::ImageLuma8(enhanced),
        Err(e) => {
            warn!("Image enhancement failed, using original image: {}", e);
            image.clone()
        }
    }
}

/// Run the enhancement pipeline, surfacing errors to the caller
pub fn try_enhance(image: &DynamicImage) -> Result<GrayImage, EnhanceError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(EnhanceError::EmptyImage(width, height));
    }

    let gray = to_grayscale(image);
    let equalized = clahe(&gray, CLAHE_CLIP_LIMIT, CLAHE_TILE_GRID)?;
    let binary = threshold(&equalized, BINARY_THRESHOLD);
    let closed = close(&binary, CLOSE_KERNEL_SIZE / 2);

    debug!("Enhanced {}x{} image", width, height);
    Ok(closed)
}

/// Convert to single-channel luma.
///
/// Uses the fixed-point BT.601 weights (0.299, 0.587, 0.114). Alpha is dropped.
pub fn to_grayscale(image: &DynamicImage) -> GrayImage {
    if let DynamicImage::ImageLuma8(gray) = image {
        return gray.clone();
    }

    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();

    GrayImage::from_fn(width, height, |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let luma = (r as u32 * 4899 + g as u32 * 9617 + b as u32 * 1868 + (1 << 13)) >> 14;
        Luma([luma.min(255) as u8])
    })
}

/// Contrast Limited Adaptive Histogram Equalization
///
/// The image is split into `grid` x `grid` tiles. Images whose size is not a
/// multiple of the grid are virtually padded by mirroring (without repeating
/// the edge pixel). Each tile gets a clipped, redistributed histogram and a
/// cumulative lookup table; output pixels are bilinearly interpolated between
/// the four nearest tile tables.
pub fn clahe(src: &GrayImage, clip_limit: f32, grid: u32) -> Result<GrayImage, EnhanceError> {
    if grid == 0 {
        return Err(EnhanceError::InvalidTileGrid(grid));
    }

    let (width, height) = src.dimensions();
    if width == 0 || height == 0 {
        return Err(EnhanceError::EmptyImage(width, height));
    }

    let tile_w = width.div_ceil(grid);
    let tile_h = height.div_ceil(grid);
    let tile_area = (tile_w as usize) * (tile_h as usize);

    let clip = if clip_limit > 0.0 {
        ((clip_limit * tile_area as f32 / HIST_BINS as f32) as usize).max(1)
    } else {
        0
    };
    let lut_scale = 255.0 / tile_area as f32;

    let tiles = grid as usize;
    let mut luts = vec![[0u8; HIST_BINS]; tiles * tiles];

    for ty in 0..grid {
        for tx in 0..grid {
            let mut hist = [0usize; HIST_BINS];

            for y in ty * tile_h..(ty + 1) * tile_h {
                let sy = reflect_101(y, height);
                for x in tx * tile_w..(tx + 1) * tile_w {
                    let sx = reflect_101(x, width);
                    hist[src.get_pixel(sx, sy)[0] as usize] += 1;
                }
            }

            if clip > 0 {
                clip_histogram(&mut hist, clip);
            }

            let lut = &mut luts[ty as usize * tiles + tx as usize];
            let mut sum = 0usize;
            for (value, count) in hist.iter().enumerate() {
                sum += count;
                lut[value] = (sum as f32 * lut_scale).round().min(255.0) as u8;
            }
        }
    }

    let inv_tw = 1.0 / tile_w as f32;
    let inv_th = 1.0 / tile_h as f32;
    let last = tiles as i64 - 1;

    let mut out = GrayImage::new(width, height);
    for y in 0..height {
        let tyf = y as f32 * inv_th - 0.5;
        let ty1 = tyf.floor() as i64;
        let ya = tyf - ty1 as f32;
        let ty2 = (ty1 + 1).min(last) as usize;
        let ty1 = ty1.max(0) as usize;

        for x in 0..width {
            let txf = x as f32 * inv_tw - 0.5;
            let tx1 = txf.floor() as i64;
            let xa = txf - tx1 as f32;
            let tx2 = (tx1 + 1).min(last) as usize;
            let tx1 = tx1.max(0) as usize;

            let v = src.get_pixel(x, y)[0] as usize;
            let lut = |ty: usize, tx: usize| luts[ty * tiles + tx][v] as f32;

            let top = lut(ty1, tx1) * (1.0 - xa) + lut(ty1, tx2) * xa;
            let bottom = lut(ty2, tx1) * (1.0 - xa) + lut(ty2, tx2) * xa;
            let res = top * (1.0 - ya) + bottom * ya;

            out.put_pixel(x, y, Luma([res.round().clamp(0.0, 255.0) as u8]));
        }
    }

    Ok(out)
}

/// Clip histogram bins at `clip` and spread the excess evenly
fn clip_histogram(hist: &mut [usize; HIST_BINS], clip: usize) {
    let mut clipped = 0usize;
    for count in hist.iter_mut() {
        if *count > clip {
            clipped += *count - clip;
            *count = clip;
        }
    }

    let batch = clipped / HIST_BINS;
    let mut residual = clipped - batch * HIST_BINS;

    for count in hist.iter_mut() {
        *count += batch;
    }

    if residual > 0 {
        let step = (HIST_BINS / residual).max(1);
        let mut i = 0;
        while i < HIST_BINS && residual > 0 {
            hist[i] += 1;
            residual -= 1;
            i += step;
        }
    }
}

/// Mirror an out-of-range coordinate back into `0..len` (gfedcb|abcdefgh|gfedcba)
fn reflect_101(i: u32, len: u32) -> u32 {
    if len == 1 {
        return 0;
    }
    let period = 2 * (len - 1);
    let i = i % period;
    if i < len {
        i
    } else {
        period - i
    }
}

/// Binarize: `> level` becomes 255, everything else 0
pub fn threshold(src: &GrayImage, level: u8) -> GrayImage {
    let mut out = src.clone();
    for pixel in out.pixels_mut() {
        pixel[0] = if pixel[0] > level { 255 } else { 0 };
    }
    out
}

#[derive(Debug, Clone, Copy)]
enum MorphOp {
    Dilate,
    Erode,
}

/// Morphological closing (dilate, then erode) with a square element of
/// side `2 * radius + 1`
pub fn close(src: &GrayImage, radius: u32) -> GrayImage {
    let dilated = morphology(src, radius, MorphOp::Dilate);
    morphology(&dilated, radius, MorphOp::Erode)
}

/// Square-window max/min filter. Pixels outside the image are ignored.
fn morphology(src: &GrayImage, radius: u32, op: MorphOp) -> GrayImage {
    let (width, height) = src.dimensions();
    let mut out = GrayImage::new(width, height);

    for y in 0..height {
        let y0 = y.saturating_sub(radius);
        let y1 = (y + radius).min(height - 1);
        for x in 0..width {
            let x0 = x.saturating_sub(radius);
            let x1 = (x + radius).min(width - 1);

            let mut acc = match op {
                MorphOp::Dilate => u8::MIN,
                MorphOp::Erode => u8::MAX,
            };
            for ny in y0..=y1 {
                for nx in x0..=x1 {
                    let v = src.get_pixel(nx, ny)[0];
                    acc = match op {
                        MorphOp::Dilate => acc.max(v),
                        MorphOp::Erode => acc.min(v),
                    };
                }
            }
            out.put_pixel(x, y, Luma([acc]));
        }
    }

    out
}
