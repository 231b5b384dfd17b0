// SPDX-License-Identifier: MIT

//! Leaderboard aggregation over the HTTP surface.

use axum::http::StatusCode;
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;

async fn create_rated_entry(app: &axum::Router, token: &str, rating: f64) {
    let response = app
        .clone()
        .oneshot(common::authed_request(
            "POST",
            "/api/poops",
            token,
            Some(json!({
                "lat": 37.4,
                "lng": -122.1,
                "privacy": "public",
                "rating": rating,
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

async fn leaderboard(app: &axum::Router, token: &str, query: &str) -> Vec<Value> {
    let response = app
        .clone()
        .oneshot(common::authed_request(
            "GET",
            &format!("/api/leaderboard{}", query),
            token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    common::json_body(response).await["data"]
        .as_array()
        .unwrap()
        .clone()
}

#[tokio::test]
async fn test_ranking_by_volume_with_average_rating() {
    let (app, state) = common::create_test_app();
    let u1 = common::create_test_jwt("u1@example.com", &state.config.jwt_signing_key);
    let u2 = common::create_test_jwt("u2@example.com", &state.config.jwt_signing_key);

    // u1: three entries averaging 4.0; u2: one entry at 5.0
    for rating in [3.0, 4.0, 5.0] {
        create_rated_entry(&app, &u1, rating).await;
    }
    create_rated_entry(&app, &u2, 5.0).await;

    let board = leaderboard(&app, &u1, "?period=weekly").await;

    assert_eq!(board.len(), 2);
    assert_eq!(board[0]["user_id"], json!("u1@example.com"));
    assert_eq!(board[0]["total_poops"], json!(3));
    assert_eq!(board[0]["average_rating"], json!(4.0));
    assert_eq!(board[1]["user_id"], json!("u2@example.com"));
}

#[tokio::test]
async fn test_all_time_includes_old_entries() {
    let (app, state) = common::create_test_app();
    let u1 = common::create_test_jwt("u1@example.com", &state.config.jwt_signing_key);

    // An entry far outside the weekly window
    let response = app
        .clone()
        .oneshot(common::authed_request(
            "POST",
            "/api/poops",
            &u1,
            Some(json!({
                "lat": 0.0,
                "lng": 0.0,
                "privacy": "public",
                "timestamp": 1_000_000,
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert!(leaderboard(&app, &u1, "?period=weekly").await.is_empty());
    assert_eq!(leaderboard(&app, &u1, "?period=allTime").await.len(), 1);
}

#[tokio::test]
async fn test_friends_board_excludes_strangers() {
    let (app, state) = common::create_test_app();
    let alice = common::create_test_jwt("alice@example.com", &state.config.jwt_signing_key);
    let bob = common::create_test_jwt("bob@example.com", &state.config.jwt_signing_key);
    let carol = common::create_test_jwt("carol@example.com", &state.config.jwt_signing_key);

    create_rated_entry(&app, &alice, 4.0).await;
    create_rated_entry(&app, &bob, 4.0).await;
    create_rated_entry(&app, &carol, 4.0).await;

    let befriend = app
        .clone()
        .oneshot(common::authed_request(
            "POST",
            "/api/friends",
            &alice,
            Some(json!({"friend_email": "bob@example.com", "friend_name": "Bob"})),
        ))
        .await
        .unwrap();
    assert_eq!(befriend.status(), StatusCode::OK);

    let board = leaderboard(&app, &alice, "?period=weekly&friends=true").await;

    let users: Vec<&str> = board
        .iter()
        .map(|e| e["user_id"].as_str().unwrap())
        .collect();
    assert_eq!(board.len(), 2);
    assert!(users.contains(&"alice@example.com"));
    assert!(users.contains(&"bob@example.com"));
    assert!(!users.contains(&"carol@example.com"));
}
