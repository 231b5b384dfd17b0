// SPDX-License-Identifier: MIT

//! Reactive subscription behavior on the in-memory store.

use poop_map_api::store::{collections, Filter, Order, Store};
use serde_json::json;

#[tokio::test]
async fn test_subscription_delivers_fresh_results_on_insert() {
    let store = Store::memory();
    let mut sub = store.watch(
        collections::POOPS,
        Filter::new().eq("privacy", "public"),
        Some(Order::desc("timestamp")),
        None,
    );

    assert!(sub.current().await.unwrap().is_empty());

    store
        .insert(
            collections::POOPS,
            json!({"user_id": "alice", "privacy": "public", "timestamp": 100}),
        )
        .await
        .unwrap();

    let results = sub.next_change().await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["user_id"], json!("alice"));
}

#[tokio::test]
async fn test_subscription_filter_hides_non_matching_writes() {
    let store = Store::memory();
    let mut sub = store.watch(
        collections::POOPS,
        Filter::new().eq("privacy", "public"),
        None,
        None,
    );

    // A private write wakes the subscriber but stays out of the result set
    store
        .insert(
            collections::POOPS,
            json!({"user_id": "alice", "privacy": "private", "timestamp": 100}),
        )
        .await
        .unwrap();

    assert!(sub.next_change().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_subscription_sees_deletes() {
    let store = Store::memory();
    let id = store
        .insert(
            collections::LIKES,
            json!({"poop_id": "p1", "user_id": "alice", "timestamp": 100}),
        )
        .await
        .unwrap();

    let mut sub = store.watch(
        collections::LIKES,
        Filter::new().eq("poop_id", "p1"),
        None,
        None,
    );
    assert_eq!(sub.current().await.unwrap().len(), 1);

    store.delete(collections::LIKES, &id).await.unwrap();
    assert!(sub.next_change().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_collections_are_isolated() {
    let store = Store::memory();
    let mut sub = store.watch(collections::COMMENTS, Filter::new(), None, None);

    // Writes to another collection never wake this subscriber
    store
        .insert(collections::POOPS, json!({"user_id": "alice", "timestamp": 1}))
        .await
        .unwrap();
    store
        .insert(
            collections::COMMENTS,
            json!({"poop_id": "p1", "content": "hi", "timestamp": 2}),
        )
        .await
        .unwrap();

    let results = sub.next_change().await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["content"], json!("hi"));
}
