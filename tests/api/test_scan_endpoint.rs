// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Scan endpoint tests for POST /api/ocr
//!
//! The recognizer is replaced by fixed fragments, so these exercise upload
//! handling, number extraction and credential matching without model files.

use super::helpers::*;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use cardscan::{
    api::{
        http_server::AppState,
        ocr::{EMPTY_FILE_MESSAGE, NOT_RECOGNIZED_MESSAGE, NO_IMAGE_MESSAGE},
    },
    credentials::SCAN_MESSAGES,
};
use image::{DynamicImage, ImageFormat};
use std::sync::Arc;

fn state_reading(fragments: &[&str]) -> AppState {
    AppState::new_for_test().with_recognizer(FixedRecognizer::new(fragments))
}

#[tokio::test]
async fn test_scan_valid_card() {
    let state = state_reading(&["2269727192", "455427"]);
    let response = send(state, scan_request(&[Part::file("image", "card.png", card_png())])).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["valid"], true);
    assert_eq!(json["card"], "2269727192");
    assert_eq!(json["pin"], "455427");
    assert_eq!(json["message"], SCAN_MESSAGES.accepted);
}

#[tokio::test]
async fn test_scan_numbers_inside_text() {
    // Short runs (12, 29) are dropped before picking card and PIN
    let state = state_reading(&["Card No: 1234567890", "exp 12/29", "PIN 123456"]);
    let response = send(state, scan_request(&[Part::file("image", "card.jpg", card_png())])).await;

    let json = body_json(response).await;
    assert_eq!(json["card"], "1234567890");
    assert_eq!(json["pin"], "123456");
    assert_eq!(json["valid"], true);
}

#[tokio::test]
async fn test_scan_extra_numbers_ignored() {
    let state = state_reading(&["9876543210 654321 5555 77777"]);
    let response = send(state, scan_request(&[Part::file("image", "card.png", card_png())])).await;

    let json = body_json(response).await;
    assert_eq!(json["card"], "9876543210");
    assert_eq!(json["pin"], "654321");
    assert_eq!(json["success"], true);
}

#[tokio::test]
async fn test_scan_unknown_pair() {
    let state = state_reading(&["1111222233", "9999"]);
    let response = send(state, scan_request(&[Part::file("image", "card.png", card_png())])).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["valid"], false);
    assert_eq!(json["card"], "1111222233");
    assert_eq!(json["pin"], "9999");
    assert_eq!(json["message"], SCAN_MESSAGES.rejected);
}

#[tokio::test]
async fn test_scan_single_number_not_recognized() {
    let state = state_reading(&["2269727192", "PIN 12"]);
    let response = send(state, scan_request(&[Part::file("image", "card.png", card_png())])).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(
        json,
        serde_json::json!({
            "success": false,
            "card": null,
            "pin": null,
            "valid": false,
            "message": NOT_RECOGNIZED_MESSAGE,
        })
    );
}

#[tokio::test]
async fn test_scan_without_ocr_engine() {
    let response = send(
        AppState::new_for_test(),
        scan_request(&[Part::file("image", "card.png", card_png())]),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], NOT_RECOGNIZED_MESSAGE);
}

#[tokio::test]
async fn test_scan_accepts_grayscale_upload() {
    let gray = DynamicImage::ImageLuma8(image::GrayImage::from_pixel(32, 20, image::Luma([200])));
    let state = state_reading(&["admin 12345"]);
    let response = send(
        state,
        scan_request(&[Part::file("image", "gray.png", encode(&gray, ImageFormat::Png))]),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    // "admin" is not numeric, so only one number is found
    let json = body_json(response).await;
    assert_eq!(json["message"], NOT_RECOGNIZED_MESSAGE);
}

#[tokio::test]
async fn test_scan_missing_image_field() {
    let state = state_reading(&["2269727192", "455427"]);
    let response = send(
        state,
        scan_request(&[Part::file("photo", "card.png", card_png())]),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json, serde_json::json!({"error": NO_IMAGE_MESSAGE}));
}

#[tokio::test]
async fn test_scan_image_field_without_filename() {
    let state = state_reading(&["2269727192", "455427"]);
    let response = send(state, scan_request(&[Part::text("image", "not a file")])).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], NO_IMAGE_MESSAGE);
}

#[tokio::test]
async fn test_scan_empty_filename() {
    let state = state_reading(&["2269727192", "455427"]);
    let response = send(state, scan_request(&[Part::file("image", "", card_png())])).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json, serde_json::json!({ "error": EMPTY_FILE_MESSAGE }));
}

#[tokio::test]
async fn test_scan_not_multipart() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/ocr")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"image": "abc"}"#))
        .unwrap();

    let response = send(AppState::new_for_test(), request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(!json["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_scan_undecodable_image() {
    let state = state_reading(&["2269727192", "455427"]);
    let response = send(
        state,
        scan_request(&[Part::file("image", "card.png", b"definitely not pixels".to_vec())]),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert!(!json["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_scan_recognizer_failure() {
    let state = AppState::new_for_test().with_recognizer(Arc::new(BrokenRecognizer));
    let response = send(state, scan_request(&[Part::file("image", "card.png", card_png())])).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("inference session crashed"));
}

#[tokio::test]
async fn test_scan_upload_over_limit() {
    let state = state_reading(&["2269727192", "455427"]).with_max_upload_bytes(256);
    let big = vec![0u8; 4096];
    let response = send(state, scan_request(&[Part::file("image", "big.png", big)])).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(
        json,
        serde_json::json!({
            "error": "Image data is too large: 4096 bytes (max: 256 bytes)",
            "success": false
        })
    );
}

#[tokio::test]
async fn test_scan_upload_exactly_at_limit() {
    let png = card_png();
    let state = state_reading(&["2269727192", "455427"]).with_max_upload_bytes(png.len());
    let response = send(state, scan_request(&[Part::file("image", "card.png", png)])).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["valid"], true);
}
