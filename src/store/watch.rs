// SPDX-License-Identifier: MIT

//! Reactive query subscriptions.
//!
//! A subscription registers a (collection, filter) pair; every committed
//! mutation on that collection wakes the subscriber, which re-runs the query
//! and receives the fresh result set. Cancellation is dropping the handle.
//! Change propagation is process-local for every backend.

use crate::error::Result;
use crate::store::{Filter, Order, Store};
use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::broadcast;

const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Per-collection change broadcast registry.
pub struct ChangeNotifier {
    senders: DashMap<String, broadcast::Sender<()>>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self {
            senders: DashMap::new(),
        }
    }

    /// Wake all subscribers of a collection. No-op without subscribers.
    pub fn notify(&self, collection: &str) {
        if let Some(sender) = self.senders.get(collection) {
            // Send only fails when every receiver is gone; stale senders are
            // harmless and reused on the next subscribe.
            let _ = sender.send(());
        }
    }

    pub fn subscribe(&self, collection: &str) -> broadcast::Receiver<()> {
        self.senders
            .entry(collection.to_string())
            .or_insert_with(|| broadcast::channel(CHANGE_CHANNEL_CAPACITY).0)
            .subscribe()
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Live query handle returned by [`Store::watch`].
pub struct Subscription {
    store: Store,
    collection: &'static str,
    filter: Filter,
    order: Option<Order>,
    limit: Option<u32>,
    receiver: broadcast::Receiver<()>,
}

impl Subscription {
    pub(crate) fn new(
        store: Store,
        collection: &'static str,
        filter: Filter,
        order: Option<Order>,
        limit: Option<u32>,
        receiver: broadcast::Receiver<()>,
    ) -> Self {
        Self {
            store,
            collection,
            filter,
            order,
            limit,
            receiver,
        }
    }

    /// Run the query immediately (initial snapshot).
    pub async fn current(&self) -> Result<Vec<Value>> {
        self.store
            .find(
                self.collection,
                &self.filter,
                self.order.as_ref(),
                self.limit,
            )
            .await
    }

    /// Wait for the next committed change to the collection, then re-run the
    /// query. A lagged receiver skips to the freshest state, which is
    /// harmless because every delivery is a full re-query.
    pub async fn next_change(&mut self) -> Result<Vec<Value>> {
        loop {
            match self.receiver.recv().await {
                Ok(()) => break,
                Err(broadcast::error::RecvError::Lagged(_)) => break,
                Err(broadcast::error::RecvError::Closed) => {
                    // Notifier outlives the store; treat closure as a final
                    // snapshot request.
                    break;
                }
            }
        }
        self.current().await
    }
}
