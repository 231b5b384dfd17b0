// SPDX-License-Identifier: MIT

//! Friend and friend-request models.

use serde::{Deserialize, Serialize};

/// Lifecycle state shared by friend records and friend requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FriendStatus {
    Pending,
    Accepted,
    Rejected,
}

impl FriendStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FriendStatus::Pending => "pending",
            FriendStatus::Accepted => "accepted",
            FriendStatus::Rejected => "rejected",
        }
    }
}

/// Directional friend record.
///
/// A mutual friendship is two records, one per direction; removal only
/// touches the record for its own direction. Keyed by (user_id,
/// friend_email), writes are upserts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Friend {
    #[serde(default)]
    pub id: String,
    pub user_id: String,
    pub friend_email: String,
    pub friend_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friend_picture: Option<String>,
    pub status: FriendStatus,
    /// Unix seconds
    pub added_at: i64,
}

/// A request from one user to befriend another.
///
/// At most one `pending` request exists per (from_user_email, to_user_email)
/// pair; re-sending while pending returns the existing record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendRequest {
    #[serde(default)]
    pub id: String,
    pub from_user_id: String,
    pub from_user_name: String,
    pub from_user_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_user_picture: Option<String>,
    pub to_user_email: String,
    pub status: FriendStatus,
    /// Unix seconds
    pub timestamp: i64,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}
