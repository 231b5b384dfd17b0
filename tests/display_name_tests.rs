// SPDX-License-Identifier: MIT

//! One-time display-name change over the HTTP surface.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;

mod common;

/// Create a user through the session route and return its token.
async fn login(app: &axum::Router, email: &str, name: &str) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/session")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({"email": email, "name": name}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    common::json_body(response).await["data"]["token"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_display_name_change_is_one_time() {
    let (app, _) = common::create_test_app();
    let token = login(&app, "alice@example.com", "Alice").await;

    // Initially changeable
    let status = app
        .clone()
        .oneshot(common::authed_request("GET", "/api/me/display-name", &token, None))
        .await
        .unwrap();
    let body = common::json_body(status).await;
    assert_eq!(body["data"]["can_change"], json!(true));
    assert_eq!(body["data"]["display_name"], json!("Alice"));

    // First change succeeds and trims
    let changed = app
        .clone()
        .oneshot(common::authed_request(
            "PUT",
            "/api/me/display-name",
            &token,
            Some(json!({"display_name": "  Captain Log  "})),
        ))
        .await
        .unwrap();
    assert_eq!(changed.status(), StatusCode::OK);
    let body = common::json_body(changed).await;
    assert_eq!(body["data"]["display_name"], json!("Captain Log"));
    assert_eq!(body["data"]["has_changed_name"], json!(true));

    // Second change is rejected, name untouched
    let again = app
        .clone()
        .oneshot(common::authed_request(
            "PUT",
            "/api/me/display-name",
            &token,
            Some(json!({"display_name": "Another Name"})),
        ))
        .await
        .unwrap();
    assert_eq!(again.status(), StatusCode::BAD_REQUEST);

    let status = app
        .oneshot(common::authed_request("GET", "/api/me/display-name", &token, None))
        .await
        .unwrap();
    let body = common::json_body(status).await;
    assert_eq!(body["data"]["display_name"], json!("Captain Log"));
    assert_eq!(body["data"]["can_change"], json!(false));
}

#[tokio::test]
async fn test_rejected_names() {
    let (app, _) = common::create_test_app();
    let token = login(&app, "bob@example.com", "Bob").await;

    let too_long = "x".repeat(21);
    for bad in [
        "   ",              // whitespace only
        too_long.as_str(),  // over the length cap
        "The Admin",        // denylist substring
        "SYSTEM of a down", // denylist, case-insensitive
        "latest",           // contains "test"
    ] {
        let response = app
            .clone()
            .oneshot(common::authed_request(
                "PUT",
                "/api/me/display-name",
                &token,
                Some(json!({"display_name": bad})),
            ))
            .await
            .unwrap();
        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "name {:?} should be rejected",
            bad
        );
    }

    // A failed attempt does not consume the one-time change
    let status = app
        .oneshot(common::authed_request("GET", "/api/me/display-name", &token, None))
        .await
        .unwrap();
    assert_eq!(
        common::json_body(status).await["data"]["can_change"],
        json!(true)
    );
}

#[tokio::test]
async fn test_batch_display_names_fall_back_to_email() {
    let (app, _) = common::create_test_app();
    let token = login(&app, "alice@example.com", "Alice").await;

    let response = app
        .oneshot(common::authed_request(
            "POST",
            "/api/users/display-names",
            &token,
            Some(json!({"emails": ["alice@example.com", "ghost@example.com"]})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::json_body(response).await;
    assert_eq!(
        body["data"]["alice@example.com"]["display_name"],
        json!("Alice")
    );
    // Unknown users resolve to their email
    assert_eq!(
        body["data"]["ghost@example.com"]["display_name"],
        json!("ghost@example.com")
    );
}
