// SPDX-License-Identifier: MIT

//! Entry ("poop") CRUD.

use crate::error::{AppError, Result};
use crate::models::{Poop, Privacy};
use crate::services::{from_docs, to_doc};
use crate::store::{collections, Filter, Order, Store};
use crate::time_utils::now_rfc3339;
use serde_json::{Map, Value};

/// Fields an owner may change after creation.
#[derive(Debug, Default, Clone)]
pub struct PoopUpdate {
    pub rating: Option<f64>,
    pub notes: Option<String>,
    pub privacy: Option<Privacy>,
}

#[derive(Clone)]
pub struct EntryService {
    store: Store,
}

impl EntryService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Store a new entry; stamps created_at/updated_at and returns it with
    /// its generated id.
    pub async fn create_poop(&self, mut poop: Poop) -> Result<Poop> {
        let now = now_rfc3339();
        poop.created_at = now.clone();
        poop.updated_at = now;

        let id = self
            .store
            .insert(collections::POOPS, to_doc(&poop)?)
            .await?;
        poop.id = id;

        tracing::info!(
            entry_id = %poop.id,
            user_id = %poop.user_id,
            privacy = poop.privacy.as_str(),
            "Entry created"
        );
        Ok(poop)
    }

    /// All entries owned by a user, newest first.
    pub async fn get_user_poops(&self, user_id: &str) -> Result<Vec<Poop>> {
        let docs = self
            .store
            .find(
                collections::POOPS,
                &Filter::new().eq("user_id", user_id),
                Some(&Order::desc("timestamp")),
                None,
            )
            .await?;
        from_docs(docs)
    }

    pub async fn get_poop(&self, id: &str) -> Result<Option<Poop>> {
        match self.store.get(collections::POOPS, id).await? {
            Some(doc) => Ok(Some(crate::services::from_doc(doc)?)),
            None => Ok(None),
        }
    }

    /// Merge the owner-editable fields; only provided fields change.
    pub async fn update_poop(&self, id: &str, update: PoopUpdate) -> Result<()> {
        let mut patch = Map::new();
        if let Some(rating) = update.rating {
            patch.insert("rating".to_string(), rating.into());
        }
        if let Some(notes) = update.notes {
            patch.insert("notes".to_string(), notes.into());
        }
        if let Some(privacy) = update.privacy {
            patch.insert(
                "privacy".to_string(),
                Value::String(privacy.as_str().to_string()),
            );
        }
        patch.insert("updated_at".to_string(), now_rfc3339().into());

        let matched = self
            .store
            .update(collections::POOPS, id, Value::Object(patch))
            .await?;
        if !matched {
            return Err(AppError::NotFound(format!("Entry {} not found", id)));
        }

        tracing::debug!(entry_id = id, "Entry updated");
        Ok(())
    }

    /// Delete an entry. Comments and likes referencing it are left in place
    /// (no cascade).
    pub async fn delete_poop(&self, id: &str) -> Result<()> {
        let deleted = self.store.delete(collections::POOPS, id).await?;
        if deleted == 0 {
            return Err(AppError::NotFound(format!("Entry {} not found", id)));
        }
        tracing::info!(entry_id = id, "Entry deleted");
        Ok(())
    }
}
