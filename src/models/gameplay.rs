// SPDX-License-Identifier: MIT

//! Auxiliary gameplay entities: items, attacks, achievements, challenges,
//! notifications. Independently keyed; cross-entity references are id
//! strings without enforcement.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    PoopBomb,
    GoldenPoop,
    RainbowPoop,
    StinkyPoop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

/// Collectible item held in an inventory or spent on an attack.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub rarity: Rarity,
    /// Unix seconds
    pub obtained_at: i64,
}

/// Per-user item inventory, keyed by user_id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default)]
    pub id: String,
    pub user_id: String,
    pub items: Vec<Item>,
    pub total_poops: u32,
    /// Unix seconds
    pub last_updated: i64,
}

impl Inventory {
    /// Empty inventory returned when a user has none stored yet.
    pub fn empty(user_id: &str, now: i64) -> Self {
        Self {
            id: String::new(),
            user_id: user_id.to_string(),
            items: Vec::new(),
            total_poops: 0,
            last_updated: now,
        }
    }
}

/// An item attack sent from one user to another.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attack {
    #[serde(default)]
    pub id: String,
    pub from_user_id: String,
    pub from_user_name: String,
    pub from_user_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_user_picture: Option<String>,
    pub to_user_id: String,
    pub to_user_email: String,
    pub item_used: Item,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Unix seconds
    pub timestamp: i64,
    pub viewed: bool,
}

/// Unlocked achievement record, keyed by (user_id, achievement_id).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    #[serde(default)]
    pub id: String,
    pub user_id: String,
    pub achievement_id: String,
    /// Unix seconds
    pub unlocked_at: i64,
    pub progress: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeKind {
    PoopCount,
    RatingStreak,
    FriendInvite,
    AttackCount,
    LocationVariety,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeStatus {
    Active,
    Completed,
    Expired,
}

/// Reward granted on challenge completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeReward {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: i64,
}

/// A time-boxed group challenge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Challenge {
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: ChallengeKind,
    pub target: i64,
    /// Window length in seconds
    pub duration: i64,
    pub created_by: String,
    pub created_by_name: String,
    pub participants: Vec<String>,
    /// Unix seconds
    pub start_time: i64,
    /// Unix seconds
    pub end_time: i64,
    pub status: ChallengeStatus,
    pub reward: ChallengeReward,
}

/// Per-participant progress toward a challenge target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeProgress {
    #[serde(default)]
    pub id: String,
    pub challenge_id: String,
    pub user_id: String,
    pub progress: i64,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    FriendRequest,
    AttackReceived,
    AchievementUnlocked,
    ChallengeInvite,
    LeaderboardUpdate,
    ItemReceived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPriority {
    Low,
    Medium,
    High,
}

/// Activity-feed notification delivered to a single user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    #[serde(default)]
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub icon: String,
    pub priority: NotificationPriority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
    #[serde(default)]
    pub data: serde_json::Value,
    /// Unix seconds
    pub timestamp: i64,
    pub read: bool,
}
