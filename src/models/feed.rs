// SPDX-License-Identifier: MIT

//! Activity-feed and leaderboard models.

use crate::models::Privacy;
use serde::{Deserialize, Serialize};

/// Kind of event published to the activity feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedActivityKind {
    PoopRecorded,
    AchievementUnlocked,
    FriendAdded,
    AttackSent,
    ChallengeCompleted,
}

/// One entry in a user's activity feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedActivity {
    #[serde(default)]
    pub id: String,
    pub user_id: String,
    pub user_email: String,
    pub user_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_picture: Option<String>,
    #[serde(rename = "type")]
    pub kind: FeedActivityKind,
    /// Kind-specific payload (entry id, achievement name, target user, ...);
    /// referential linkage only, not enforced.
    #[serde(default)]
    pub data: serde_json::Value,
    pub privacy: Privacy,
    /// Unix seconds
    pub timestamp: i64,
}

/// Aggregation window for the leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LeaderboardPeriod {
    Weekly,
    Monthly,
    AllTime,
}

/// Per-user aggregate row on the leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub total_poops: u32,
    pub average_rating: f64,
    /// Unix seconds of the most recent entry in the window
    pub last_poop_time: i64,
}
