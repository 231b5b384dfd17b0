// SPDX-License-Identifier: MIT

//! User identity: idempotent login upsert and the one-time display-name
//! change.

use crate::error::{AppError, Result};
use crate::models::User;
use crate::services::{from_doc, to_doc};
use crate::store::{collections, Store};
use crate::time_utils::now_unix;
use futures_util::{stream, StreamExt};
use serde_json::{json, Map, Value};
use std::collections::HashMap;

const MAX_CONCURRENT_LOOKUPS: usize = 16;
const DISPLAY_NAME_MAX_CHARS: usize = 20;
/// Substring denylist, matched case-insensitively anywhere in the name.
const DISPLAY_NAME_DENYLIST: [&str; 5] = ["admin", "system", "null", "undefined", "test"];

/// Users are keyed by email; the encoded email doubles as the document id.
fn user_doc_id(email: &str) -> String {
    urlencoding::encode(email).into_owned()
}

/// Validate a requested display name, returning the trimmed value.
///
/// Order: non-empty after trim, length cap, denylist scan. Any failure is a
/// caller error with no state change.
fn validate_display_name(display_name: &str) -> Result<String> {
    let trimmed = display_name.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest(
            "Display name must not be empty".to_string(),
        ));
    }

    if trimmed.chars().count() > DISPLAY_NAME_MAX_CHARS {
        return Err(AppError::BadRequest(format!(
            "Display name must be at most {} characters",
            DISPLAY_NAME_MAX_CHARS
        )));
    }

    let lowered = trimmed.to_lowercase();
    if DISPLAY_NAME_DENYLIST
        .iter()
        .any(|word| lowered.contains(word))
    {
        return Err(AppError::BadRequest(
            "Display name contains a disallowed word".to_string(),
        ));
    }

    Ok(trimmed.to_string())
}

/// Display name and picture for one user in a batch lookup.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DisplayNameEntry {
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

#[derive(Clone)]
pub struct IdentityService {
    store: Store,
}

impl IdentityService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Idempotent login upsert keyed by email.
    ///
    /// Repeat calls bump `last_login_at` and refresh name/picture only when
    /// the newly provided value is non-empty; stored values win otherwise.
    pub async fn get_or_create_user(
        &self,
        email: &str,
        name: Option<String>,
        picture: Option<String>,
    ) -> Result<User> {
        let doc_id = user_doc_id(email);
        let now = now_unix();

        if let Some(doc) = self.store.get(collections::USERS, &doc_id).await? {
            let existing: User = from_doc(doc)?;

            let mut patch = Map::new();
            patch.insert("last_login_at".to_string(), now.into());
            if let Some(name) = name.as_deref().filter(|n| !n.is_empty()) {
                patch.insert("name".to_string(), name.into());
            }
            if let Some(picture) = picture.as_deref().filter(|p| !p.is_empty()) {
                patch.insert("picture".to_string(), picture.into());
            }

            self.store
                .update(collections::USERS, &doc_id, Value::Object(patch))
                .await?;

            return Ok(User {
                last_login_at: now,
                name: name.filter(|n| !n.is_empty()).or(existing.name),
                picture: picture.filter(|p| !p.is_empty()).or(existing.picture),
                ..existing
            });
        }

        let user = User {
            id: doc_id.clone(),
            email: email.to_string(),
            // Initial display name mirrors the provider name
            display_name: name.clone(),
            name,
            picture,
            has_changed_name: false,
            created_at: now,
            last_login_at: now,
        };

        self.store
            .upsert(collections::USERS, &doc_id, to_doc(&user)?)
            .await?;

        tracing::info!(email, "User created");
        Ok(user)
    }

    pub async fn get_user(&self, email: &str) -> Result<Option<User>> {
        match self.store.get(collections::USERS, &user_doc_id(email)).await? {
            Some(doc) => Ok(Some(from_doc(doc)?)),
            None => Ok(None),
        }
    }

    /// One-way rename state machine: a user may set a display name exactly
    /// once, after which the name is locked permanently.
    ///
    /// Validation order: existence, lock check, name rules; any failure
    /// aborts with no partial state change.
    pub async fn update_display_name(&self, email: &str, display_name: &str) -> Result<User> {
        let mut user = self
            .get_user(email)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", email)))?;

        if user.has_changed_name {
            return Err(AppError::BadRequest(
                "Display name can only be changed once".to_string(),
            ));
        }

        let trimmed = validate_display_name(display_name)?;

        self.store
            .update(
                collections::USERS,
                &user_doc_id(email),
                json!({
                    "display_name": trimmed,
                    "has_changed_name": true,
                }),
            )
            .await?;

        tracing::info!(email, display_name = %trimmed, "Display name changed");

        user.display_name = Some(trimmed);
        user.has_changed_name = true;
        Ok(user)
    }

    /// Whether the one-time rename is still available. Unknown users can
    /// still pick a name on first login.
    pub async fn can_change_display_name(&self, email: &str) -> Result<bool> {
        Ok(self
            .get_user(email)
            .await?
            .map_or(true, |user| !user.has_changed_name))
    }

    /// Resolve a user's public display name: display name, provider name,
    /// then the email itself.
    pub async fn get_display_name(&self, email: &str) -> Result<String> {
        Ok(self
            .get_user(email)
            .await?
            .and_then(|u| u.display_name.or(u.name))
            .unwrap_or_else(|| email.to_string()))
    }

    /// Batch display-name resolution with bounded concurrency.
    pub async fn get_batch_display_names(
        &self,
        emails: &[String],
    ) -> Result<HashMap<String, DisplayNameEntry>> {
        let entries: Vec<Result<(String, DisplayNameEntry)>> = stream::iter(emails.to_vec())
            .map(|email| async move {
                let user = self.get_user(&email).await?;
                let entry = DisplayNameEntry {
                    display_name: user
                        .as_ref()
                        .and_then(|u| u.display_name.clone().or_else(|| u.name.clone()))
                        .unwrap_or_else(|| email.clone()),
                    picture: user.and_then(|u| u.picture),
                };
                Ok((email, entry))
            })
            .buffer_unordered(MAX_CONCURRENT_LOOKUPS)
            .collect()
            .await;

        entries.into_iter().collect()
    }
}
