// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Route registration tests
//!
//! Routes live under /api, only accept their own method, and carry
//! permissive CORS headers.

use super::helpers::*;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use cardscan::api::http_server::AppState;

fn request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_scan_route_rejects_get() {
    let response = send(AppState::new_for_test(), request(Method::GET, "/api/ocr")).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_validate_route_rejects_get() {
    let response = send(AppState::new_for_test(), request(Method::GET, "/api/validate")).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_health_route_rejects_post() {
    let response = send(AppState::new_for_test(), request(Method::POST, "/api/health")).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_routes_require_api_prefix() {
    let response = send(AppState::new_for_test(), request(Method::GET, "/health")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(AppState::new_for_test(), request(Method::GET, "/api/unknown")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/health")
        .header(header::ORIGIN, "http://router.local")
        .body(Body::empty())
        .unwrap();

    let response = send(AppState::new_for_test(), request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_cors_preflight() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/ocr")
        .header(header::ORIGIN, "http://router.local")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = send(AppState::new_for_test(), request).await;
    assert!(response.status().is_success());
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}
