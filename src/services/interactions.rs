// SPDX-License-Identifier: MIT

//! Likes and comments on entries.

use crate::error::{AppError, Result};
use crate::models::{Comment, Like, PoopInteractions};
use crate::services::{from_docs, to_doc};
use crate::store::{collections, Filter, Order, Store};
use crate::time_utils::now_rfc3339;

/// Composite id enforcing one like per (poop, user).
fn like_doc_id(poop_id: &str, user_id: &str) -> String {
    format!("{}_{}", poop_id, urlencoding::encode(user_id))
}

#[derive(Clone)]
pub struct InteractionService {
    store: Store,
}

impl InteractionService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    // ─── Likes ───────────────────────────────────────────────────

    /// Add a like. A second like by the same user on the same entry fails
    /// with `ALREADY_LIKED` (409); the conditional insert makes the
    /// uniqueness check atomic rather than read-then-write.
    pub async fn add_like(&self, mut like: Like) -> Result<String> {
        let now = now_rfc3339();
        like.created_at = now.clone();
        like.updated_at = now;
        let doc_id = like_doc_id(&like.poop_id, &like.user_id);

        let inserted = self
            .store
            .insert_unique(collections::LIKES, &doc_id, to_doc(&like)?)
            .await?;
        if !inserted {
            return Err(AppError::already_liked());
        }

        tracing::info!(
            entry_id = %like.poop_id,
            user_id = %like.user_id,
            "Like added"
        );
        Ok(doc_id)
    }

    /// Remove a like if present. Removing an absent like is a no-op, not an
    /// error.
    pub async fn remove_like(&self, poop_id: &str, user_id: &str) -> Result<u64> {
        let deleted = self
            .store
            .delete(collections::LIKES, &like_doc_id(poop_id, user_id))
            .await?;
        if deleted > 0 {
            tracing::info!(entry_id = poop_id, user_id, "Like removed");
        }
        Ok(deleted)
    }

    // ─── Comments ────────────────────────────────────────────────

    pub async fn add_comment(&self, mut comment: Comment) -> Result<Comment> {
        let now = now_rfc3339();
        comment.created_at = now.clone();
        comment.updated_at = now;
        let id = self
            .store
            .insert(collections::COMMENTS, to_doc(&comment)?)
            .await?;
        comment.id = id;

        tracing::info!(
            comment_id = %comment.id,
            entry_id = %comment.poop_id,
            "Comment added"
        );
        Ok(comment)
    }

    /// Delete a comment by id. No ownership check: any caller holding a
    /// comment id may delete it (documented trusted-client behavior).
    pub async fn delete_comment(&self, comment_id: &str) -> Result<()> {
        let deleted = self.store.delete(collections::COMMENTS, comment_id).await?;
        if deleted == 0 {
            return Err(AppError::NotFound(format!(
                "Comment {} not found",
                comment_id
            )));
        }
        tracing::info!(comment_id, "Comment deleted");
        Ok(())
    }

    // ─── Composite View ──────────────────────────────────────────

    /// Comments (ascending) and likes (descending) for an entry, fetched
    /// concurrently.
    pub async fn get_poop_interactions(&self, poop_id: &str) -> Result<PoopInteractions> {
        let comments_filter = Filter::new().eq("poop_id", poop_id);
        let likes_filter = Filter::new().eq("poop_id", poop_id);
        let comments_order = Order::asc("timestamp");
        let likes_order = Order::desc("timestamp");

        let (comments, likes) = tokio::join!(
            self.store.find(
                collections::COMMENTS,
                &comments_filter,
                Some(&comments_order),
                None,
            ),
            self.store.find(
                collections::LIKES,
                &likes_filter,
                Some(&likes_order),
                None,
            ),
        );

        Ok(PoopInteractions {
            comments: from_docs(comments?)?,
            likes: from_docs(likes?)?,
        })
    }
}
