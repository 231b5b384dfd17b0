// SPDX-License-Identifier: MIT

//! Comment and like models.

use serde::{Deserialize, Serialize};

/// Comment on an entry. Immutable once created except for deletion;
/// displayed ascending by timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub id: String,
    pub poop_id: String,
    pub user_id: String,
    pub user_email: String,
    pub user_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_picture: Option<String>,
    pub content: String,
    /// Unix seconds
    pub timestamp: i64,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Like on an entry. At most one per (poop_id, user_id), enforced by a
/// conditional insert on the composite document id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Like {
    #[serde(default)]
    pub id: String,
    pub poop_id: String,
    pub user_id: String,
    pub user_email: String,
    pub user_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_picture: Option<String>,
    /// Unix seconds
    pub timestamp: i64,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Composite interaction view for a single entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoopInteractions {
    /// Ascending by timestamp
    pub comments: Vec<Comment>,
    /// Descending by timestamp
    pub likes: Vec<Like>,
}
