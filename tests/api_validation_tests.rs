// SPDX-License-Identifier: MIT

//! API input validation tests.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;

mod common;

#[tokio::test]
async fn test_session_rejects_invalid_email() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/session")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({"email": "not-an-email"}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::json_body(response).await;
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_create_poop_rejects_out_of_range_latitude() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("alice@example.com", &state.config.jwt_signing_key);

    let response = app
        .oneshot(common::authed_request(
            "POST",
            "/api/poops",
            &token,
            Some(json!({"lat": 91.0, "lng": 0.0, "privacy": "public"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_poop_rejects_rating_above_five() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("alice@example.com", &state.config.jwt_signing_key);

    let response = app
        .oneshot(common::authed_request(
            "POST",
            "/api/poops",
            &token,
            Some(json!({"lat": 0.0, "lng": 0.0, "rating": 5.5, "privacy": "private"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_poop_rejects_unknown_privacy() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("alice@example.com", &state.config.jwt_signing_key);

    let response = app
        .oneshot(common::authed_request(
            "POST",
            "/api/poops",
            &token,
            Some(json!({"lat": 0.0, "lng": 0.0, "privacy": "everyone"})),
        ))
        .await
        .unwrap();

    // Serde rejects the unknown enum variant before the handler runs
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_empty_comment_rejected() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("alice@example.com", &state.config.jwt_signing_key);

    let response = app
        .oneshot(common::authed_request(
            "POST",
            "/api/poops/some-id/comments",
            &token,
            Some(json!({"content": "", "user_name": "Alice"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_entry_returns_404() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("alice@example.com", &state.config.jwt_signing_key);

    let response = app
        .oneshot(common::authed_request(
            "GET",
            "/api/poops/does-not-exist",
            &token,
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = common::json_body(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("not_found"));
}
