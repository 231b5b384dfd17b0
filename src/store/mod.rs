// SPDX-License-Identifier: MIT

//! Persistence adapter over named document collections.
//!
//! All domain services talk to [`Store`], which dispatches to exactly one
//! backend per deployment: the in-memory store (development and tests) or
//! Firestore. Documents are JSON objects carrying their identifier in an
//! `id` string field regardless of the backend's native representation.

pub mod firestore;
pub mod memory;
pub mod watch;

use crate::error::{AppError, Result};
use firestore::FirestoreStore;
use memory::MemoryStore;
use serde_json::Value;
use std::sync::Arc;
use watch::{ChangeNotifier, Subscription};

/// Collection names as constants.
pub mod collections {
    pub const POOPS: &str = "poops";
    pub const FRIENDS: &str = "friends";
    pub const FRIEND_REQUESTS: &str = "friend_requests";
    pub const COMMENTS: &str = "comments";
    pub const LIKES: &str = "likes";
    pub const USERS: &str = "users";
    pub const INVENTORIES: &str = "inventories";
    pub const POOP_ATTACKS: &str = "poop_attacks";
    pub const ACHIEVEMENTS: &str = "achievements";
    pub const CHALLENGES: &str = "challenges";
    pub const CHALLENGE_PROGRESS: &str = "challenge_progress";
    pub const NOTIFICATIONS: &str = "notifications";
    pub const FEED_ACTIVITIES: &str = "feed_activities";
}

/// A scalar value usable in query filters.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl From<&str> for FilterValue {
    fn from(v: &str) -> Self {
        FilterValue::Str(v.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(v: String) -> Self {
        FilterValue::Str(v)
    }
}

impl From<i64> for FilterValue {
    fn from(v: i64) -> Self {
        FilterValue::Int(v)
    }
}

impl From<bool> for FilterValue {
    fn from(v: bool) -> Self {
        FilterValue::Bool(v)
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Clause {
    /// Field equals value.
    Eq(String, FilterValue),
    /// String field is a member of the given set.
    In(String, Vec<String>),
    /// Numeric field is >= the given value.
    Gte(String, i64),
    /// Numeric field is < the given value.
    Lt(String, i64),
}

/// Conjunction of field clauses; an empty filter matches everything.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    clauses: Vec<Clause>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &str, value: impl Into<FilterValue>) -> Self {
        self.clauses.push(Clause::Eq(field.to_string(), value.into()));
        self
    }

    pub fn in_set(mut self, field: &str, values: &[String]) -> Self {
        self.clauses
            .push(Clause::In(field.to_string(), values.to_vec()));
        self
    }

    pub fn gte(mut self, field: &str, value: i64) -> Self {
        self.clauses.push(Clause::Gte(field.to_string(), value));
        self
    }

    pub fn lt(mut self, field: &str, value: i64) -> Self {
        self.clauses.push(Clause::Lt(field.to_string(), value));
        self
    }

    pub(crate) fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Evaluate the filter against a document (memory backend and watch
    /// re-queries).
    pub(crate) fn matches(&self, doc: &Value) -> bool {
        self.clauses.iter().all(|clause| match clause {
            Clause::Eq(field, value) => match (doc.get(field), value) {
                (Some(Value::String(s)), FilterValue::Str(v)) => s == v,
                (Some(Value::Number(n)), FilterValue::Int(v)) => n.as_i64() == Some(*v),
                (Some(Value::Bool(b)), FilterValue::Bool(v)) => b == v,
                _ => false,
            },
            Clause::In(field, values) => doc
                .get(field)
                .and_then(Value::as_str)
                .map(|s| values.iter().any(|v| v == s))
                .unwrap_or(false),
            Clause::Gte(field, min) => doc
                .get(field)
                .and_then(Value::as_i64)
                .map(|n| n >= *min)
                .unwrap_or(false),
            Clause::Lt(field, max) => doc
                .get(field)
                .and_then(Value::as_i64)
                .map(|n| n < *max)
                .unwrap_or(false),
        })
    }
}

/// Sort direction for query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// Single-field ordering of query results.
#[derive(Debug, Clone)]
pub struct Order {
    pub field: String,
    pub direction: Direction,
}

impl Order {
    pub fn asc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            direction: Direction::Desc,
        }
    }
}

#[derive(Clone)]
enum Backend {
    Memory(MemoryStore),
    Firestore(FirestoreStore),
}

/// Persistence adapter handle, cheap to clone.
///
/// Mutations notify watch subscribers for the affected collection after the
/// backend write commits.
#[derive(Clone)]
pub struct Store {
    backend: Backend,
    notifier: Arc<ChangeNotifier>,
}

impl Store {
    /// In-memory backend.
    pub fn memory() -> Self {
        Self {
            backend: Backend::Memory(MemoryStore::new()),
            notifier: Arc::new(ChangeNotifier::new()),
        }
    }

    /// Firestore backend.
    pub async fn firestore(project_id: &str) -> Result<Self> {
        Ok(Self {
            backend: Backend::Firestore(FirestoreStore::new(project_id).await?),
            notifier: Arc::new(ChangeNotifier::new()),
        })
    }

    /// Filtered read, optionally ordered and capped.
    pub async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        order: Option<&Order>,
        limit: Option<u32>,
    ) -> Result<Vec<Value>> {
        match &self.backend {
            Backend::Memory(m) => m.find(collection, filter, order, limit),
            Backend::Firestore(f) => f.find(collection, filter, order, limit).await,
        }
    }

    /// First document matching the filter, if any.
    pub async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Value>> {
        let mut results = self.find(collection, filter, None, Some(1)).await?;
        Ok(results.pop())
    }

    /// Keyed lookup by document id.
    pub async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>> {
        match &self.backend {
            Backend::Memory(m) => m.get(collection, id),
            Backend::Firestore(f) => f.get(collection, id).await,
        }
    }

    /// Insert with a generated id; returns the id.
    pub async fn insert(&self, collection: &str, mut doc: Value) -> Result<String> {
        let id = uuid::Uuid::new_v4().to_string();
        set_doc_id(&mut doc, &id)?;
        match &self.backend {
            Backend::Memory(m) => m.put_new(collection, &id, doc)?,
            Backend::Firestore(f) => f.create(collection, &id, &doc).await?,
        }
        self.notifier.notify(collection);
        Ok(id)
    }

    /// Conditional insert by caller-supplied id.
    ///
    /// Returns `false` without writing when a document with that id already
    /// exists. This is the atomic uniqueness guard for per-key invariants
    /// such as one like per (poop, user).
    pub async fn insert_unique(&self, collection: &str, id: &str, mut doc: Value) -> Result<bool> {
        set_doc_id(&mut doc, id)?;
        let inserted = match &self.backend {
            Backend::Memory(m) => m.put_if_absent(collection, id, doc)?,
            Backend::Firestore(f) => f.create_if_absent(collection, id, &doc).await?,
        };
        if inserted {
            self.notifier.notify(collection);
        }
        Ok(inserted)
    }

    /// Merge only the provided top-level fields into an existing document.
    ///
    /// Returns `false` if no document matched.
    pub async fn update(&self, collection: &str, id: &str, patch: Value) -> Result<bool> {
        let matched = match &self.backend {
            Backend::Memory(m) => m.merge(collection, id, &patch)?,
            Backend::Firestore(f) => f.merge(collection, id, &patch).await?,
        };
        if matched {
            self.notifier.notify(collection);
        }
        Ok(matched)
    }

    /// Create-or-replace by deterministic composite key.
    pub async fn upsert(&self, collection: &str, id: &str, mut doc: Value) -> Result<()> {
        set_doc_id(&mut doc, id)?;
        match &self.backend {
            Backend::Memory(m) => m.put(collection, id, doc)?,
            Backend::Firestore(f) => f.set(collection, id, &doc).await?,
        }
        self.notifier.notify(collection);
        Ok(())
    }

    /// Delete by id; returns the deleted count (0 or 1).
    pub async fn delete(&self, collection: &str, id: &str) -> Result<u64> {
        let deleted = match &self.backend {
            Backend::Memory(m) => m.remove(collection, id)?,
            Backend::Firestore(f) => f.remove(collection, id).await?,
        };
        if deleted > 0 {
            self.notifier.notify(collection);
        }
        Ok(deleted)
    }

    /// Register a reactive subscription: each committed mutation on the
    /// collection re-runs the query and delivers the fresh result set.
    /// Dropping the returned handle cancels the subscription.
    pub fn watch(
        &self,
        collection: &'static str,
        filter: Filter,
        order: Option<Order>,
        limit: Option<u32>,
    ) -> Subscription {
        Subscription::new(
            self.clone(),
            collection,
            filter,
            order,
            limit,
            self.notifier.subscribe(collection),
        )
    }
}

/// Write the document id into the `id` field, requiring an object document.
fn set_doc_id(doc: &mut Value, id: &str) -> Result<()> {
    match doc.as_object_mut() {
        Some(map) => {
            map.insert("id".to_string(), Value::String(id.to_string()));
            Ok(())
        }
        None => Err(AppError::Database(
            "Document must be a JSON object".to_string(),
        )),
    }
}

/// Extract a document's id field.
pub fn doc_id(doc: &Value) -> Option<&str> {
    doc.get("id").and_then(Value::as_str)
}
