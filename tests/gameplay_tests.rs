// SPDX-License-Identifier: MIT

//! Gameplay flows: inventory, attacks, achievements, challenges,
//! notifications.

use axum::http::StatusCode;
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;

async fn post(app: &axum::Router, token: &str, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(common::authed_request("POST", uri, token, Some(body)))
        .await
        .unwrap();
    let status = response.status();
    (status, common::json_body(response).await)
}

async fn get(app: &axum::Router, token: &str, uri: &str) -> Value {
    let response = app
        .clone()
        .oneshot(common::authed_request("GET", uri, token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    common::json_body(response).await
}

fn test_item() -> Value {
    json!({
        "type": "poop_bomb",
        "name": "Poop Bomb",
        "description": "Splat",
        "icon": "bomb",
        "rarity": "common",
    })
}

#[tokio::test]
async fn test_inventory_starts_empty_and_tracks_items() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("alice@example.com", &state.config.jwt_signing_key);

    let empty = get(&app, &token, "/api/inventory").await;
    assert!(empty["data"]["items"].as_array().unwrap().is_empty());
    assert_eq!(empty["data"]["total_poops"], json!(0));

    let (status, added) = post(&app, &token, "/api/inventory/items", test_item()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(added["data"]["items"].as_array().unwrap().len(), 1);
    assert_eq!(added["data"]["total_poops"], json!(1));

    let item_id = added["data"]["items"][0]["id"].as_str().unwrap().to_string();

    // Using the item removes it and returns it
    let (status, used) = post(
        &app,
        &token,
        &format!("/api/inventory/items/{}/use", item_id),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(used["data"]["name"], json!("Poop Bomb"));

    let after = get(&app, &token, "/api/inventory").await;
    assert!(after["data"]["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_using_missing_item_is_404() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("alice@example.com", &state.config.jwt_signing_key);

    // No inventory at all yet
    let (status, _) = post(&app, &token, "/api/inventory/items/ghost/use", json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_attack_lifecycle() {
    let (app, state) = common::create_test_app();
    let alice = common::create_test_jwt("alice@example.com", &state.config.jwt_signing_key);
    let bob = common::create_test_jwt("bob@example.com", &state.config.jwt_signing_key);

    let mut item = test_item();
    item["id"] = json!("item-1");
    item["obtained_at"] = json!(100);

    let (status, created) = post(
        &app,
        &alice,
        "/api/attacks",
        json!({
            "to_user_email": "bob@example.com",
            "from_user_name": "Alice",
            "item_used": item,
            "message": "gotcha",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["data"]["viewed"], json!(false));
    let attack_id = created["data"]["id"].as_str().unwrap().to_string();

    // Bob sees it among unviewed attacks
    let unviewed = get(&app, &bob, "/api/attacks/unviewed").await;
    assert_eq!(unviewed["data"].as_array().unwrap().len(), 1);

    let mark = app
        .clone()
        .oneshot(common::authed_request(
            "PUT",
            &format!("/api/attacks/{}/viewed", attack_id),
            &bob,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(mark.status(), StatusCode::OK);

    let after = get(&app, &bob, "/api/attacks/unviewed").await;
    assert!(after["data"].as_array().unwrap().is_empty());

    // Still listed in the full history
    let all = get(&app, &bob, "/api/attacks").await;
    assert_eq!(all["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_achievement_unlock_is_idempotent() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("alice@example.com", &state.config.jwt_signing_key);

    let payload = json!({"achievement_id": "first_poop"});

    let (status, first) = post(&app, &token, "/api/achievements", payload.clone()).await;
    assert_eq!(status, StatusCode::OK);
    let (status, second) = post(&app, &token, "/api/achievements", payload).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(first["data"]["id"], second["data"]["id"]);

    let list = get(&app, &token, "/api/achievements").await;
    assert_eq!(list["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_challenge_completion_at_target() {
    let (app, state) = common::create_test_app();
    let alice = common::create_test_jwt("alice@example.com", &state.config.jwt_signing_key);

    let (status, created) = post(
        &app,
        &alice,
        "/api/challenges",
        json!({
            "title": "Weekly grind",
            "description": "Ten entries in a week",
            "type": "poop_count",
            "target": 10,
            "duration": 604800,
            "created_by_name": "Alice",
            "participants": ["alice@example.com", "bob@example.com"],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let challenge = &created["data"];
    assert_eq!(challenge["status"], json!("active"));
    assert_eq!(
        challenge["end_time"].as_i64().unwrap() - challenge["start_time"].as_i64().unwrap(),
        604800
    );
    assert_eq!(challenge["reward"]["value"], json!(100));
    let challenge_id = challenge["id"].as_str().unwrap().to_string();

    // Short of the target: progress recorded, not completed
    let partial = app
        .clone()
        .oneshot(common::authed_request(
            "PUT",
            &format!("/api/challenges/{}/progress", challenge_id),
            &alice,
            Some(json!({"progress": 9})),
        ))
        .await
        .unwrap();
    assert_eq!(partial.status(), StatusCode::OK);
    assert!(common::json_body(partial).await["data"].is_string());

    // Reaching the target completes
    let done = app
        .clone()
        .oneshot(common::authed_request(
            "PUT",
            &format!("/api/challenges/{}/progress", challenge_id),
            &alice,
            Some(json!({"progress": 10})),
        ))
        .await
        .unwrap();
    assert_eq!(done.status(), StatusCode::OK);

    // The challenge shows up in the creator's list
    let list = get(&app, &alice, "/api/challenges").await;
    assert_eq!(list["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_progress_on_unknown_challenge_is_noop() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("alice@example.com", &state.config.jwt_signing_key);

    let response = app
        .oneshot(common::authed_request(
            "PUT",
            "/api/challenges/ghost/progress",
            &token,
            Some(json!({"progress": 1})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(common::json_body(response).await["data"].is_null());
}

#[tokio::test]
async fn test_notification_read_flow() {
    let (app, state) = common::create_test_app();
    let alice = common::create_test_jwt("alice@example.com", &state.config.jwt_signing_key);
    let bob = common::create_test_jwt("bob@example.com", &state.config.jwt_signing_key);

    // Alice notifies Bob
    let (status, created) = post(
        &app,
        &alice,
        "/api/notifications",
        json!({
            "user_id": "bob@example.com",
            "type": "attack_received",
            "title": "Incoming!",
            "message": "Alice attacked you",
            "icon": "bomb",
            "priority": "high",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["data"]["read"], json!(false));
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let list = get(&app, &bob, "/api/notifications").await;
    assert_eq!(list["data"].as_array().unwrap().len(), 1);

    let mark = app
        .clone()
        .oneshot(common::authed_request(
            "PUT",
            &format!("/api/notifications/{}/read", id),
            &bob,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(mark.status(), StatusCode::OK);

    let after = get(&app, &bob, "/api/notifications").await;
    assert_eq!(after["data"][0]["read"], json!(true));
}
