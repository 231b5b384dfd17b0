// SPDX-License-Identifier: MIT

//! Gameplay features: item inventories, attacks, achievements, challenges,
//! and notifications.

use crate::error::{AppError, Result};
use crate::models::gameplay::{
    Achievement, Attack, Challenge, ChallengeProgress, ChallengeStatus, Inventory, Item,
    Notification,
};
use crate::services::{from_doc, from_docs, to_doc};
use crate::store::{collections, Filter, Order, Store};
use crate::time_utils::now_unix;
use serde_json::json;
use std::collections::HashMap;

const ATTACK_FEED_LIMIT: u32 = 50;
const NOTIFICATION_FEED_LIMIT: u32 = 50;
const CREATED_CHALLENGES_LIMIT: u32 = 25;
const CHALLENGE_SCAN_LIMIT: u32 = 50;
const ACTIVE_CHALLENGES_LIMIT: u32 = 20;
const ATTACK_RETENTION_SECONDS: i64 = 30 * 24 * 60 * 60;
const CHALLENGE_POINTS_PER_TARGET: i64 = 10;
const DEFAULT_ACHIEVEMENT_PROGRESS: f64 = 100.0;

fn inventory_doc_id(user_id: &str) -> String {
    urlencoding::encode(user_id).into_owned()
}

#[derive(Clone)]
pub struct GameplayService {
    store: Store,
}

impl GameplayService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    // ─── Inventory ───────────────────────────────────────────────

    /// A user's inventory; users without one get an empty default (not
    /// persisted until the first item arrives).
    pub async fn get_user_inventory(&self, user_id: &str) -> Result<Inventory> {
        match self
            .store
            .get(collections::INVENTORIES, &inventory_doc_id(user_id))
            .await?
        {
            Some(doc) => from_doc(doc),
            None => Ok(Inventory::empty(user_id, now_unix())),
        }
    }

    /// Append an item and bump the entry counter, creating the inventory on
    /// first use.
    pub async fn add_item_to_inventory(&self, user_id: &str, item: Item) -> Result<Inventory> {
        let mut inventory = self.get_user_inventory(user_id).await?;
        inventory.items.push(item);
        inventory.total_poops += 1;
        inventory.last_updated = now_unix();

        self.store
            .upsert(
                collections::INVENTORIES,
                &inventory_doc_id(user_id),
                to_doc(&inventory)?,
            )
            .await?;

        tracing::debug!(user_id, items = inventory.items.len(), "Item added to inventory");
        Ok(inventory)
    }

    /// Consume an item, removing it from the inventory and returning it.
    pub async fn use_item(&self, user_id: &str, item_id: &str) -> Result<Item> {
        let doc_id = inventory_doc_id(user_id);
        let doc = self
            .store
            .get(collections::INVENTORIES, &doc_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Inventory for {} not found", user_id)))?;
        let mut inventory: Inventory = from_doc(doc)?;

        let position = inventory
            .items
            .iter()
            .position(|item| item.id == item_id)
            .ok_or_else(|| AppError::NotFound(format!("Item {} not in inventory", item_id)))?;
        let item = inventory.items.remove(position);
        inventory.last_updated = now_unix();

        self.store
            .upsert(collections::INVENTORIES, &doc_id, to_doc(&inventory)?)
            .await?;

        tracing::info!(user_id, item_id, item_name = %item.name, "Item used");
        Ok(item)
    }

    // ─── Attacks ─────────────────────────────────────────────────

    pub async fn create_attack(&self, mut attack: Attack) -> Result<Attack> {
        attack.viewed = false;
        let id = self
            .store
            .insert(collections::POOP_ATTACKS, to_doc(&attack)?)
            .await?;
        attack.id = id;

        tracing::info!(
            from = %attack.from_user_email,
            to = %attack.to_user_email,
            item = %attack.item_used.name,
            "Attack created"
        );
        Ok(attack)
    }

    /// Recent attacks received by a user, newest first.
    pub async fn get_user_attacks(&self, user_id: &str) -> Result<Vec<Attack>> {
        let docs = self
            .store
            .find(
                collections::POOP_ATTACKS,
                &Filter::new().eq("to_user_id", user_id),
                Some(&Order::desc("timestamp")),
                Some(ATTACK_FEED_LIMIT),
            )
            .await?;
        from_docs(docs)
    }

    pub async fn get_unviewed_attacks(&self, user_id: &str) -> Result<Vec<Attack>> {
        let docs = self
            .store
            .find(
                collections::POOP_ATTACKS,
                &Filter::new().eq("to_user_id", user_id).eq("viewed", false),
                Some(&Order::desc("timestamp")),
                None,
            )
            .await?;
        from_docs(docs)
    }

    pub async fn mark_attack_viewed(&self, attack_id: &str) -> Result<()> {
        let matched = self
            .store
            .update(collections::POOP_ATTACKS, attack_id, json!({"viewed": true}))
            .await?;
        if !matched {
            return Err(AppError::NotFound(format!("Attack {} not found", attack_id)));
        }
        Ok(())
    }

    /// Delete attacks older than the retention window; returns the count.
    pub async fn cleanup_old_attacks(&self, user_id: &str) -> Result<usize> {
        let cutoff = now_unix() - ATTACK_RETENTION_SECONDS;
        let docs = self
            .store
            .find(
                collections::POOP_ATTACKS,
                &Filter::new()
                    .eq("to_user_id", user_id)
                    .lt("timestamp", cutoff),
                None,
                None,
            )
            .await?;
        let old: Vec<Attack> = from_docs(docs)?;

        for attack in &old {
            self.store
                .delete(collections::POOP_ATTACKS, &attack.id)
                .await?;
        }

        tracing::info!(user_id, count = old.len(), "Old attacks cleaned up");
        Ok(old.len())
    }

    // ─── Achievements ────────────────────────────────────────────

    pub async fn get_user_achievements(&self, user_id: &str) -> Result<Vec<Achievement>> {
        let docs = self
            .store
            .find(
                collections::ACHIEVEMENTS,
                &Filter::new().eq("user_id", user_id),
                None,
                None,
            )
            .await?;
        from_docs(docs)
    }

    /// Unlock an achievement. Re-unlocking returns the existing record's id
    /// without writing.
    pub async fn unlock_achievement(
        &self,
        user_id: &str,
        achievement_id: &str,
        progress: Option<f64>,
    ) -> Result<String> {
        let existing = self
            .store
            .find_one(
                collections::ACHIEVEMENTS,
                &Filter::new()
                    .eq("user_id", user_id)
                    .eq("achievement_id", achievement_id),
            )
            .await?;

        if let Some(doc) = existing {
            let achievement: Achievement = from_doc(doc)?;
            tracing::debug!(user_id, achievement_id, "Achievement already unlocked");
            return Ok(achievement.id);
        }

        let achievement = Achievement {
            id: String::new(),
            user_id: user_id.to_string(),
            achievement_id: achievement_id.to_string(),
            unlocked_at: now_unix(),
            progress: progress.unwrap_or(DEFAULT_ACHIEVEMENT_PROGRESS),
        };

        let id = self
            .store
            .insert(collections::ACHIEVEMENTS, to_doc(&achievement)?)
            .await?;
        tracing::info!(user_id, achievement_id, "Achievement unlocked");
        Ok(id)
    }

    // ─── Challenges ──────────────────────────────────────────────

    /// Create a challenge plus one progress record per participant.
    pub async fn create_challenge(&self, mut challenge: Challenge) -> Result<Challenge> {
        let now = now_unix();
        challenge.start_time = now;
        challenge.end_time = now + challenge.duration;
        challenge.status = ChallengeStatus::Active;
        challenge.reward = crate::models::gameplay::ChallengeReward {
            kind: "points".to_string(),
            value: challenge.target * CHALLENGE_POINTS_PER_TARGET,
        };

        let id = self
            .store
            .insert(collections::CHALLENGES, to_doc(&challenge)?)
            .await?;
        challenge.id = id;

        for participant in &challenge.participants {
            let progress = ChallengeProgress {
                id: String::new(),
                challenge_id: challenge.id.clone(),
                user_id: participant.clone(),
                progress: 0,
                completed: false,
                completed_at: None,
            };
            self.store
                .insert(collections::CHALLENGE_PROGRESS, to_doc(&progress)?)
                .await?;
        }

        tracing::info!(
            challenge_id = %challenge.id,
            participants = challenge.participants.len(),
            "Challenge created"
        );
        Ok(challenge)
    }

    /// Challenges relevant to a user (created or participating, deduped),
    /// or all active challenges when no user is given.
    pub async fn get_challenges(&self, user_id: Option<&str>) -> Result<Vec<Challenge>> {
        let Some(user_id) = user_id else {
            let docs = self
                .store
                .find(
                    collections::CHALLENGES,
                    &Filter::new().eq("status", "active"),
                    Some(&Order::desc("start_time")),
                    Some(ACTIVE_CHALLENGES_LIMIT),
                )
                .await?;
            return from_docs(docs);
        };

        let created_filter = Filter::new().eq("created_by", user_id);
        let recent_filter = Filter::new();
        let order = Order::desc("start_time");
        let (created, recent) = tokio::join!(
            self.store.find(
                collections::CHALLENGES,
                &created_filter,
                Some(&order),
                Some(CREATED_CHALLENGES_LIMIT),
            ),
            self.store.find(
                collections::CHALLENGES,
                &recent_filter,
                Some(&order),
                Some(CHALLENGE_SCAN_LIMIT),
            ),
        );

        let created: Vec<Challenge> = from_docs(created?)?;
        let recent: Vec<Challenge> = from_docs(recent?)?;

        // Participation is an array membership check the adapter does not
        // express, so it is applied here over the recent scan.
        let participated = recent
            .into_iter()
            .filter(|c| c.participants.iter().any(|p| p == user_id));

        let mut merged: HashMap<String, Challenge> = HashMap::new();
        for challenge in created.into_iter().chain(participated) {
            merged.insert(challenge.id.clone(), challenge);
        }

        let mut challenges: Vec<Challenge> = merged.into_values().collect();
        challenges.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        Ok(challenges)
    }

    /// Record a participant's progress; completion is reaching the
    /// challenge target. A missing progress record or challenge is a no-op
    /// returning `None`.
    pub async fn update_challenge_progress(
        &self,
        challenge_id: &str,
        user_id: &str,
        progress: i64,
    ) -> Result<Option<String>> {
        let Some(record_doc) = self
            .store
            .find_one(
                collections::CHALLENGE_PROGRESS,
                &Filter::new()
                    .eq("challenge_id", challenge_id)
                    .eq("user_id", user_id),
            )
            .await?
        else {
            tracing::debug!(challenge_id, user_id, "No progress record found");
            return Ok(None);
        };
        let record: ChallengeProgress = from_doc(record_doc)?;

        let Some(challenge_doc) = self.store.get(collections::CHALLENGES, challenge_id).await?
        else {
            tracing::debug!(challenge_id, "Challenge not found");
            return Ok(None);
        };
        let challenge: Challenge = from_doc(challenge_doc)?;

        let completed = progress >= challenge.target;
        let mut patch = json!({
            "progress": progress,
            "completed": completed,
        });
        if completed {
            patch["completed_at"] = json!(now_unix());
        }

        self.store
            .update(collections::CHALLENGE_PROGRESS, &record.id, patch)
            .await?;

        tracing::debug!(
            challenge_id,
            user_id,
            progress,
            target = challenge.target,
            completed,
            "Challenge progress updated"
        );
        Ok(Some(record.id))
    }

    // ─── Notifications ───────────────────────────────────────────

    pub async fn create_notification(&self, mut notification: Notification) -> Result<Notification> {
        notification.timestamp = now_unix();
        notification.read = false;

        let id = self
            .store
            .insert(collections::NOTIFICATIONS, to_doc(&notification)?)
            .await?;
        notification.id = id;

        tracing::debug!(
            notification_id = %notification.id,
            user_id = %notification.user_id,
            kind = ?notification.kind,
            "Notification created"
        );
        Ok(notification)
    }

    pub async fn get_user_notifications(&self, user_id: &str) -> Result<Vec<Notification>> {
        let docs = self
            .store
            .find(
                collections::NOTIFICATIONS,
                &Filter::new().eq("user_id", user_id),
                Some(&Order::desc("timestamp")),
                Some(NOTIFICATION_FEED_LIMIT),
            )
            .await?;
        from_docs(docs)
    }

    pub async fn mark_notification_read(&self, notification_id: &str) -> Result<()> {
        let matched = self
            .store
            .update(
                collections::NOTIFICATIONS,
                notification_id,
                json!({"read": true}),
            )
            .await?;
        if !matched {
            return Err(AppError::NotFound(format!(
                "Notification {} not found",
                notification_id
            )));
        }
        Ok(())
    }
}
