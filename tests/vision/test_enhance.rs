// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Decode + enhance pipeline tests on synthetic card photos

use cardscan::vision::{decode_image_bytes, enhance_image, try_enhance, ImageError, MAX_IMAGE_SIZE};
use image::{DynamicImage, GenericImageView, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;

fn encode(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), format).unwrap();
    bytes
}

/// Light card with a dark band across rows 30..40
fn striped_card() -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(120, 76, |_, y| {
        if (30..40).contains(&y) {
            Rgb([20, 20, 20])
        } else {
            Rgb([235, 230, 220])
        }
    }))
}

#[test]
fn test_enhanced_card_is_binary_and_keeps_dark_band() {
    let bytes = encode(&striped_card(), ImageFormat::Png);
    let (image, info) = decode_image_bytes(&bytes, MAX_IMAGE_SIZE).unwrap();
    assert_eq!((info.width, info.height), (120, 76));

    let enhanced = try_enhance(&image).unwrap();
    assert_eq!(enhanced.dimensions(), (120, 76));
    assert!(enhanced.pixels().all(|p| p[0] == 0 || p[0] == 255));

    assert_eq!(enhanced.get_pixel(60, 35)[0], 0);
    assert_eq!(enhanced.get_pixel(5, 5)[0], 255);
}

#[test]
fn test_jpeg_upload_enhances() {
    let bytes = encode(&striped_card(), ImageFormat::Jpeg);
    let (image, info) = decode_image_bytes(&bytes, MAX_IMAGE_SIZE).unwrap();
    assert_eq!(info.format, ImageFormat::Jpeg);

    let enhanced = enhance_image(&image);
    assert_eq!(enhanced.dimensions(), (120, 76));
    assert_eq!(enhanced.color().channel_count(), 1);
}

#[test]
fn test_rgba_upload_is_flattened_to_gray() {
    let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(16, 16, Rgba([240, 240, 240, 128])));
    let (image, info) = decode_image_bytes(&encode(&rgba, ImageFormat::Png), MAX_IMAGE_SIZE).unwrap();
    assert_eq!(info.channels, 4);

    let enhanced = enhance_image(&image);
    assert_eq!(enhanced.color().channel_count(), 1);
    assert_eq!(enhanced.dimensions(), (16, 16));
}

#[test]
fn test_degenerate_images_never_fail() {
    let one = enhance_image(&DynamicImage::new_rgb8(1, 1));
    assert_eq!(one.dimensions(), (1, 1));

    let empty = enhance_image(&DynamicImage::new_rgb8(0, 0));
    assert_eq!(empty.dimensions(), (0, 0));

    let thin = enhance_image(&DynamicImage::new_luma8(1, 300));
    assert_eq!(thin.dimensions(), (1, 300));
}

#[test]
fn test_decode_rejects_bad_payloads() {
    assert!(matches!(
        decode_image_bytes(&[], MAX_IMAGE_SIZE),
        Err(ImageError::EmptyData)
    ));
    assert!(matches!(
        decode_image_bytes(b"hello world", MAX_IMAGE_SIZE),
        Err(ImageError::UnsupportedFormat)
    ));

    let bytes = encode(&striped_card(), ImageFormat::Png);
    assert!(matches!(
        decode_image_bytes(&bytes, 16),
        Err(ImageError::TooLarge(_, 16))
    ));
}
