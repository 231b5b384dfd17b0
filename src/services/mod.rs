// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod entries;
pub mod feed;
pub mod gameplay;
pub mod identity;
pub mod interactions;
pub mod social_graph;

pub use entries::EntryService;
pub use feed::FeedService;
pub use gameplay::GameplayService;
pub use identity::IdentityService;
pub use interactions::InteractionService;
pub use social_graph::SocialGraphService;

use crate::error::{AppError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Deserialize a stored document into a typed model.
pub(crate) fn from_doc<T: DeserializeOwned>(doc: Value) -> Result<T> {
    serde_json::from_value(doc)
        .map_err(|e| AppError::Database(format!("Malformed stored document: {}", e)))
}

/// Deserialize a batch of stored documents.
pub(crate) fn from_docs<T: DeserializeOwned>(docs: Vec<Value>) -> Result<Vec<T>> {
    docs.into_iter().map(from_doc).collect()
}

/// Serialize a typed model into a storable document.
pub(crate) fn to_doc<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Serialization failed: {}", e)))
}
