// SPDX-License-Identifier: MIT

//! Social graph: friend requests and directional friend records.

use crate::error::{AppError, Result};
use crate::models::{Friend, FriendRequest, FriendStatus};
use crate::services::{from_doc, from_docs, to_doc};
use crate::store::{collections, Filter, Order, Store};
use crate::time_utils::now_rfc3339;
use serde_json::json;

/// Deterministic document id for the (user, friend) direction of a
/// friendship. Emails are url-encoded so the id stays a single opaque token.
fn friend_doc_id(user_id: &str, friend_email: &str) -> String {
    format!(
        "{}_{}",
        urlencoding::encode(user_id),
        urlencoding::encode(friend_email)
    )
}

#[derive(Clone)]
pub struct SocialGraphService {
    store: Store,
}

impl SocialGraphService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    // ─── Friend Requests ─────────────────────────────────────────

    /// Send a friend request. If a pending request for the same
    /// (from, to) pair already exists, its id is returned and no new record
    /// is written.
    pub async fn send_friend_request(&self, mut request: FriendRequest) -> Result<String> {
        let existing = self
            .store
            .find_one(
                collections::FRIEND_REQUESTS,
                &Filter::new()
                    .eq("to_user_email", request.to_user_email.as_str())
                    .eq("from_user_email", request.from_user_email.as_str())
                    .eq("status", FriendStatus::Pending.as_str()),
            )
            .await?;

        if let Some(doc) = existing {
            let existing: FriendRequest = from_doc(doc)?;
            tracing::debug!(
                request_id = %existing.id,
                from = %request.from_user_email,
                to = %request.to_user_email,
                "Friend request already pending"
            );
            return Ok(existing.id);
        }

        request.status = FriendStatus::Pending;
        let now = now_rfc3339();
        request.created_at = now.clone();
        request.updated_at = now;

        let id = self
            .store
            .insert(collections::FRIEND_REQUESTS, to_doc(&request)?)
            .await?;

        tracing::info!(
            request_id = %id,
            from = %request.from_user_email,
            to = %request.to_user_email,
            "Friend request sent"
        );
        Ok(id)
    }

    /// Pending requests addressed to a user, newest first.
    pub async fn get_friend_requests(&self, to_user_email: &str) -> Result<Vec<FriendRequest>> {
        let docs = self
            .store
            .find(
                collections::FRIEND_REQUESTS,
                &Filter::new()
                    .eq("to_user_email", to_user_email)
                    .eq("status", FriendStatus::Pending.as_str()),
                Some(&Order::desc("timestamp")),
                None,
            )
            .await?;
        from_docs(docs)
    }

    /// Patch a request's status to accepted or rejected.
    ///
    /// Deliberately does NOT write a friend record: acceptance and
    /// friend-list entry are two independent operations performed by the
    /// caller, with no atomicity between them.
    pub async fn update_friend_request_status(
        &self,
        request_id: &str,
        status: FriendStatus,
    ) -> Result<()> {
        if status == FriendStatus::Pending {
            return Err(AppError::BadRequest(
                "Request status can only move to accepted or rejected".to_string(),
            ));
        }

        let matched = self
            .store
            .update(
                collections::FRIEND_REQUESTS,
                request_id,
                json!({
                    "status": status.as_str(),
                    "updated_at": now_rfc3339(),
                }),
            )
            .await?;
        if !matched {
            return Err(AppError::NotFound(format!(
                "Friend request {} not found",
                request_id
            )));
        }

        tracing::info!(request_id, status = status.as_str(), "Friend request updated");
        Ok(())
    }

    // ─── Friend Records ──────────────────────────────────────────

    /// Upsert the (user, friend) directional record: patch status/added_at
    /// on an existing record, insert otherwise. Used for both the initial
    /// pending state and the later accepted transition.
    pub async fn add_friend(&self, friend: Friend) -> Result<String> {
        let doc_id = friend_doc_id(&friend.user_id, &friend.friend_email);

        let existing = self
            .store
            .get(collections::FRIENDS, &doc_id)
            .await?;

        if existing.is_some() {
            self.store
                .update(
                    collections::FRIENDS,
                    &doc_id,
                    json!({
                        "status": friend.status.as_str(),
                        "added_at": friend.added_at,
                    }),
                )
                .await?;
            tracing::debug!(
                user_id = %friend.user_id,
                friend_email = %friend.friend_email,
                status = friend.status.as_str(),
                "Friend record updated"
            );
        } else {
            self.store
                .upsert(collections::FRIENDS, &doc_id, to_doc(&friend)?)
                .await?;
            tracing::info!(
                user_id = %friend.user_id,
                friend_email = %friend.friend_email,
                status = friend.status.as_str(),
                "Friend record created"
            );
        }

        Ok(doc_id)
    }

    /// Delete the single directional record for (user, friend). The reverse
    /// direction, if present, is intentionally untouched.
    pub async fn remove_friend(&self, user_id: &str, friend_email: &str) -> Result<u64> {
        let deleted = self
            .store
            .delete(
                collections::FRIENDS,
                &friend_doc_id(user_id, friend_email),
            )
            .await?;

        if deleted > 0 {
            tracing::info!(user_id, friend_email, "Friend removed");
        }
        Ok(deleted)
    }

    /// Accepted friends of a user.
    pub async fn get_user_friends(&self, user_id: &str) -> Result<Vec<Friend>> {
        let docs = self
            .store
            .find(
                collections::FRIENDS,
                &Filter::new()
                    .eq("user_id", user_id)
                    .eq("status", FriendStatus::Accepted.as_str()),
                None,
                None,
            )
            .await?;
        from_docs(docs)
    }
}
