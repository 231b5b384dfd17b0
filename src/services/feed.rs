// SPDX-License-Identifier: MIT

//! Feed and leaderboard aggregation.
//!
//! Aggregates are computed in memory over single-pass scans of the matching
//! entries; windows are fixed offsets from the current time.

use crate::error::Result;
use crate::models::{FeedActivity, LeaderboardEntry, LeaderboardPeriod, Poop, Privacy};
use crate::services::{from_docs, to_doc};
use crate::store::{collections, doc_id, Filter, Order, Store};
use crate::time_utils::now_unix;
use serde_json::Value;
use std::collections::HashMap;

const PUBLIC_FEED_LIMIT: u32 = 50;
const FRIENDS_FEED_LIMIT: u32 = 100;
const ACTIVITY_FEED_LIMIT: usize = 50;
const LEADERBOARD_SIZE: usize = 50;

const WEEK_SECONDS: i64 = 7 * 24 * 60 * 60;
const MONTH_SECONDS: i64 = 30 * 24 * 60 * 60;

#[derive(Clone)]
pub struct FeedService {
    store: Store,
}

impl FeedService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    // ─── Entry Feeds ─────────────────────────────────────────────

    /// Public entries, newest first.
    pub async fn get_public_poops(&self) -> Result<Vec<Poop>> {
        let docs = self
            .store
            .find(
                collections::POOPS,
                &Filter::new().eq("privacy", Privacy::Public.as_str()),
                Some(&Order::desc("timestamp")),
                Some(PUBLIC_FEED_LIMIT),
            )
            .await?;
        from_docs(docs)
    }

    /// Friends' entries visible to the requester: owner in the friend set
    /// and privacy friends-or-public, newest first.
    ///
    /// An empty friend list short-circuits to an empty result without
    /// querying the backend.
    pub async fn get_friends_poops(&self, friend_emails: &[String]) -> Result<Vec<Poop>> {
        if friend_emails.is_empty() {
            return Ok(Vec::new());
        }

        let visible = [
            Privacy::Friends.as_str().to_string(),
            Privacy::Public.as_str().to_string(),
        ];

        let docs = self
            .store
            .find(
                collections::POOPS,
                &Filter::new()
                    .in_set("user_id", friend_emails)
                    .in_set("privacy", &visible),
                Some(&Order::desc("timestamp")),
                Some(FRIENDS_FEED_LIMIT),
            )
            .await?;
        from_docs(docs)
    }

    // ─── Leaderboard ─────────────────────────────────────────────

    /// Per-user entry counts within the period, ranked by volume.
    ///
    /// When a friend set is supplied the board is restricted to those
    /// users; users with zero entries in the window never appear.
    pub async fn get_leaderboard(
        &self,
        period: LeaderboardPeriod,
        friend_emails: Option<&[String]>,
    ) -> Result<Vec<LeaderboardEntry>> {
        let window_start = match period {
            LeaderboardPeriod::Weekly => now_unix() - WEEK_SECONDS,
            LeaderboardPeriod::Monthly => now_unix() - MONTH_SECONDS,
            LeaderboardPeriod::AllTime => 0,
        };

        let mut filter = Filter::new().gte("timestamp", window_start);
        if let Some(emails) = friend_emails.filter(|e| !e.is_empty()) {
            filter = filter.in_set("user_id", emails);
        }

        let docs = self
            .store
            .find(collections::POOPS, &filter, None, None)
            .await?;
        let poops: Vec<Poop> = from_docs(docs)?;

        let leaderboard = aggregate_leaderboard(&poops);
        tracing::debug!(
            period = ?period,
            users = leaderboard.len(),
            "Leaderboard generated"
        );
        Ok(leaderboard)
    }

    // ─── Activity Feed ───────────────────────────────────────────

    /// Feed entries visible to a user.
    ///
    /// With a non-empty friend set this returns the user's own activities
    /// plus all public ones; friends-only activities of friends are not
    /// distinguished from public here. Documented looseness, preserved
    /// as-is.
    pub async fn get_feed_activities(
        &self,
        user_id: &str,
        friend_emails: Option<&[String]>,
    ) -> Result<Vec<FeedActivity>> {
        let own_filter = Filter::new().eq("user_email", user_id);
        let order = Order::desc("timestamp");

        let has_friends = friend_emails.map_or(false, |e| !e.is_empty());
        if !has_friends {
            let docs = self
                .store
                .find(
                    collections::FEED_ACTIVITIES,
                    &own_filter,
                    Some(&order),
                    Some(ACTIVITY_FEED_LIMIT as u32),
                )
                .await?;
            return from_docs(docs);
        }

        // The adapter filter is a conjunction, so the own-OR-public union is
        // two queries merged and deduped by id.
        let public_filter = Filter::new().eq("privacy", Privacy::Public.as_str());
        let (own, public) = tokio::join!(
            self.store.find(
                collections::FEED_ACTIVITIES,
                &own_filter,
                Some(&order),
                Some(ACTIVITY_FEED_LIMIT as u32),
            ),
            self.store.find(
                collections::FEED_ACTIVITIES,
                &public_filter,
                Some(&order),
                Some(ACTIVITY_FEED_LIMIT as u32),
            ),
        );

        let mut merged: HashMap<String, Value> = HashMap::new();
        for doc in own?.into_iter().chain(public?) {
            if let Some(id) = doc_id(&doc) {
                merged.insert(id.to_string(), doc);
            }
        }

        let mut activities: Vec<FeedActivity> = from_docs(merged.into_values().collect())?;
        activities.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        activities.truncate(ACTIVITY_FEED_LIMIT);
        Ok(activities)
    }

    /// Publish an activity to the feed.
    pub async fn create_feed_activity(&self, mut activity: FeedActivity) -> Result<FeedActivity> {
        activity.timestamp = now_unix();
        let id = self
            .store
            .insert(collections::FEED_ACTIVITIES, to_doc(&activity)?)
            .await?;
        activity.id = id;

        tracing::debug!(
            activity_id = %activity.id,
            user_id = %activity.user_id,
            kind = ?activity.kind,
            "Feed activity created"
        );
        Ok(activity)
    }
}

/// Single-pass grouping of entries into ranked per-user aggregates.
///
/// Missing ratings count as zero toward the average, matching the stored
/// data where rating is optional.
fn aggregate_leaderboard(poops: &[Poop]) -> Vec<LeaderboardEntry> {
    struct Accumulator {
        total: u32,
        rating_sum: f64,
        last_time: i64,
    }

    let mut by_user: HashMap<&str, Accumulator> = HashMap::new();
    for poop in poops {
        let acc = by_user.entry(poop.user_id.as_str()).or_insert(Accumulator {
            total: 0,
            rating_sum: 0.0,
            last_time: 0,
        });
        acc.total += 1;
        acc.rating_sum += poop.rating.unwrap_or(0.0);
        acc.last_time = acc.last_time.max(poop.timestamp);
    }

    let mut leaderboard: Vec<LeaderboardEntry> = by_user
        .into_iter()
        .map(|(user_id, acc)| LeaderboardEntry {
            user_id: user_id.to_string(),
            total_poops: acc.total,
            average_rating: acc.rating_sum / acc.total as f64,
            last_poop_time: acc.last_time,
        })
        .collect();

    leaderboard.sort_by(|a, b| b.total_poops.cmp(&a.total_poops));
    leaderboard.truncate(LEADERBOARD_SIZE);
    leaderboard
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_poop(user_id: &str, timestamp: i64, rating: Option<f64>) -> Poop {
        Poop {
            id: format!("{}-{}", user_id, timestamp),
            user_id: user_id.to_string(),
            lat: 0.0,
            lng: 0.0,
            timestamp,
            rating,
            notes: None,
            photo: None,
            privacy: Privacy::Public,
            place_name: None,
            custom_location: None,
            address: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_aggregate_ranks_by_volume_with_average() {
        let poops = vec![
            make_poop("u1", 100, Some(4.0)),
            make_poop("u1", 200, Some(5.0)),
            make_poop("u1", 150, Some(3.0)),
            make_poop("u2", 300, Some(5.0)),
        ];

        let board = aggregate_leaderboard(&poops);

        assert_eq!(board.len(), 2);
        assert_eq!(board[0].user_id, "u1");
        assert_eq!(board[0].total_poops, 3);
        assert_eq!(board[0].average_rating, 4.0);
        assert_eq!(board[0].last_poop_time, 200);
        assert_eq!(board[1].user_id, "u2");
        assert_eq!(board[1].average_rating, 5.0);
    }

    #[test]
    fn test_aggregate_missing_rating_counts_as_zero() {
        let poops = vec![make_poop("u1", 100, Some(4.0)), make_poop("u1", 200, None)];

        let board = aggregate_leaderboard(&poops);
        assert_eq!(board[0].average_rating, 2.0);
    }

    #[test]
    fn test_aggregate_empty_input() {
        assert!(aggregate_leaderboard(&[]).is_empty());
    }

    #[test]
    fn test_aggregate_truncates_to_board_size() {
        let poops: Vec<Poop> = (0..60)
            .map(|i| make_poop(&format!("u{}", i), i, None))
            .collect();

        assert_eq!(aggregate_leaderboard(&poops).len(), LEADERBOARD_SIZE);
    }
}
