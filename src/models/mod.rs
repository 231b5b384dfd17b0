// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod entry;
pub mod feed;
pub mod gameplay;
pub mod interaction;
pub mod social;
pub mod user;

pub use entry::{Poop, Privacy};
pub use feed::{FeedActivity, FeedActivityKind, LeaderboardEntry, LeaderboardPeriod};
pub use gameplay::{
    Achievement, Attack, Challenge, ChallengeProgress, Inventory, Item, Notification,
};
pub use interaction::{Comment, Like, PoopInteractions};
pub use social::{Friend, FriendRequest, FriendStatus};
pub use user::User;
