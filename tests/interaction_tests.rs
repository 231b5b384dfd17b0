// SPDX-License-Identifier: MIT

//! Like and comment behavior over the HTTP surface.

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

mod common;

async fn create_entry(app: &axum::Router, token: &str) -> String {
    let response = app
        .clone()
        .oneshot(common::authed_request(
            "POST",
            "/api/poops",
            token,
            Some(json!({"lat": 37.4, "lng": -122.1, "privacy": "public"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::json_body(response).await;
    body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_double_like_conflicts() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("alice@example.com", &state.config.jwt_signing_key);
    let poop_id = create_entry(&app, &token).await;

    let like = json!({"user_name": "Alice"});
    let uri = format!("/api/poops/{}/likes", poop_id);

    let first = app
        .clone()
        .oneshot(common::authed_request("POST", &uri, &token, Some(like.clone())))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app
        .oneshot(common::authed_request("POST", &uri, &token, Some(like)))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body = common::json_body(second).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["code"], json!("ALREADY_LIKED"));
}

#[tokio::test]
async fn test_relike_after_removal_succeeds() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("alice@example.com", &state.config.jwt_signing_key);
    let poop_id = create_entry(&app, &token).await;

    let like = json!({"user_name": "Alice"});
    let uri = format!("/api/poops/{}/likes", poop_id);

    let first = app
        .clone()
        .oneshot(common::authed_request("POST", &uri, &token, Some(like.clone())))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let removed = app
        .clone()
        .oneshot(common::authed_request("DELETE", &uri, &token, None))
        .await
        .unwrap();
    assert_eq!(removed.status(), StatusCode::OK);

    let relike = app
        .oneshot(common::authed_request("POST", &uri, &token, Some(like)))
        .await
        .unwrap();
    assert_eq!(relike.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_remove_absent_like_is_noop() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("alice@example.com", &state.config.jwt_signing_key);
    let poop_id = create_entry(&app, &token).await;

    let response = app
        .oneshot(common::authed_request(
            "DELETE",
            &format!("/api/poops/{}/likes", poop_id),
            &token,
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::json_body(response).await;
    assert_eq!(body["data"]["deleted"], json!(0));
}

#[tokio::test]
async fn test_interactions_view_orders_comments_and_likes() {
    let (app, state) = common::create_test_app();
    let alice = common::create_test_jwt("alice@example.com", &state.config.jwt_signing_key);
    let bob = common::create_test_jwt("bob@example.com", &state.config.jwt_signing_key);
    let poop_id = create_entry(&app, &alice).await;

    for (token, name, text) in [
        (&alice, "Alice", "first"),
        (&bob, "Bob", "second"),
    ] {
        let response = app
            .clone()
            .oneshot(common::authed_request(
                "POST",
                &format!("/api/poops/{}/comments", poop_id),
                token,
                Some(json!({"content": text, "user_name": name})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    for (token, name) in [(&alice, "Alice"), (&bob, "Bob")] {
        let response = app
            .clone()
            .oneshot(common::authed_request(
                "POST",
                &format!("/api/poops/{}/likes", poop_id),
                token,
                Some(json!({"user_name": name})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .oneshot(common::authed_request(
            "GET",
            &format!("/api/poops/{}/interactions", poop_id),
            &alice,
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::json_body(response).await;
    let comments = body["data"]["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 2);
    let contents: Vec<&str> = comments
        .iter()
        .map(|c| c["content"].as_str().unwrap())
        .collect();
    assert!(contents.contains(&"first") && contents.contains(&"second"));
    assert_eq!(body["data"]["likes"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_delete_missing_comment_is_404() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("alice@example.com", &state.config.jwt_signing_key);

    let response = app
        .oneshot(common::authed_request(
            "DELETE",
            "/api/comments/no-such-comment",
            &token,
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
