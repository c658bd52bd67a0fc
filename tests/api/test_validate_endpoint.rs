// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Validate endpoint tests for POST /api/validate

use super::helpers::*;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use cardscan::{
    api::http_server::AppState,
    credentials::{CredentialStore, LOGIN_MESSAGES},
};

fn validate_request(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/validate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_every_builtin_pair_is_valid() {
    for record in CredentialStore::builtin().records() {
        let body = serde_json::json!({"card": record.card, "pin": record.pin}).to_string();
        let response = send(AppState::new_for_test(), validate_request(&body)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(
            json,
            serde_json::json!({"valid": true, "message": LOGIN_MESSAGES.accepted}),
            "pair {}/{} should be accepted",
            record.card,
            record.pin
        );
    }
}

#[tokio::test]
async fn test_unknown_pairs_are_invalid() {
    let cases = [
        r#"{"card": "2269727192", "pin": "654321"}"#,
        r#"{"card": "455427", "pin": "2269727192"}"#,
        r#"{"card": "ADMIN", "pin": "12345"}"#,
        r#"{"card": "admin"}"#,
        r#"{}"#,
    ];

    for body in cases {
        let response = send(AppState::new_for_test(), validate_request(body)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["valid"], false, "body {} should be rejected", body);
        assert_eq!(json["message"], LOGIN_MESSAGES.rejected);
    }
}

#[tokio::test]
async fn test_values_are_trimmed() {
    let response = send(
        AppState::new_for_test(),
        validate_request(r#"{"card": "  admin\t", "pin": " 12345 "}"#),
    )
    .await;

    let json = body_json(response).await;
    assert_eq!(json["valid"], true);
}

#[tokio::test]
async fn test_numeric_values_are_accepted() {
    let response = send(
        AppState::new_for_test(),
        validate_request(r#"{"card": 1234567890, "pin": 123456}"#),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["valid"], true);
}

#[tokio::test]
async fn test_malformed_json_is_server_error() {
    let response = send(AppState::new_for_test(), validate_request("{card: admin")).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert!(!json["error"].as_str().unwrap().is_empty());
    assert!(json.get("success").is_none());
}

#[tokio::test]
async fn test_non_object_body_is_server_error() {
    let response = send(AppState::new_for_test(), validate_request(r#"["admin", "12345"]"#)).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_body_without_json_content_type_is_server_error() {
    let body = r#"{"card": "admin", "pin": "12345"}"#;
    for content_type in [None, Some("text/plain")] {
        let mut builder = Request::builder().method(Method::POST).uri("/api/validate");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        let request = builder.body(Body::from(body)).unwrap();

        let response = send(AppState::new_for_test(), request).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{:?}", content_type);
        let json = body_json(response).await;
        assert!(json.get("valid").is_none());
        assert!(!json["error"].as_str().unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_boolean_values_never_match() {
    let response = send(
        AppState::new_for_test(),
        validate_request(r#"{"card": true, "pin": false}"#),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["valid"], false);
}
