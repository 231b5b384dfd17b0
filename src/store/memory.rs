// SPDX-License-Identifier: MIT

//! In-memory document store for local development and tests.
//!
//! Collections are concurrent maps of id -> JSON document. Queries take a
//! point-in-time snapshot; per-key conditional inserts are atomic via the
//! map entry API.

use crate::error::{AppError, Result};
use crate::store::{Direction, Filter, Order};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde_json::Value;
use std::cmp::Ordering;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct MemoryStore {
    collections: Arc<DashMap<String, DashMap<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn collection(&self, name: &str) -> dashmap::mapref::one::Ref<'_, String, DashMap<String, Value>> {
        self.collections
            .entry(name.to_string())
            .or_default()
            .downgrade()
    }

    pub fn find(
        &self,
        collection: &str,
        filter: &Filter,
        order: Option<&Order>,
        limit: Option<u32>,
    ) -> Result<Vec<Value>> {
        let col = self.collection(collection);
        let mut results: Vec<Value> = col
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();

        if let Some(order) = order {
            results.sort_by(|a, b| compare_field(a, b, &order.field, order.direction));
        }

        if let Some(limit) = limit {
            results.truncate(limit as usize);
        }

        Ok(results)
    }

    pub fn get(&self, collection: &str, id: &str) -> Result<Option<Value>> {
        Ok(self.collection(collection).get(id).map(|d| d.clone()))
    }

    pub fn put_new(&self, collection: &str, id: &str, doc: Value) -> Result<()> {
        // Generated uuids do not collide in practice; treat a collision as a
        // database fault rather than silently overwriting.
        if !self.put_if_absent(collection, id, doc)? {
            return Err(AppError::Database(format!(
                "Duplicate generated id {} in {}",
                id, collection
            )));
        }
        Ok(())
    }

    pub fn put_if_absent(&self, collection: &str, id: &str, doc: Value) -> Result<bool> {
        let col = self.collection(collection);
        let inserted = match col.entry(id.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(vacant) => {
                vacant.insert(doc);
                true
            }
        };
        Ok(inserted)
    }

    pub fn put(&self, collection: &str, id: &str, doc: Value) -> Result<()> {
        self.collection(collection).insert(id.to_string(), doc);
        Ok(())
    }

    pub fn merge(&self, collection: &str, id: &str, patch: &Value) -> Result<bool> {
        let col = self.collection(collection);
        let Some(mut existing) = col.get_mut(id) else {
            return Ok(false);
        };

        let (Some(target), Some(fields)) = (existing.as_object_mut(), patch.as_object()) else {
            return Err(AppError::Database(
                "Patch and target must be JSON objects".to_string(),
            ));
        };

        for (key, value) in fields {
            target.insert(key.clone(), value.clone());
        }

        Ok(true)
    }

    pub fn remove(&self, collection: &str, id: &str) -> Result<u64> {
        Ok(self.collection(collection).remove(id).map_or(0, |_| 1))
    }
}

/// Compare two documents on a single field for sorting.
///
/// Numbers compare numerically, strings lexicographically; documents missing
/// the field sort last regardless of direction.
fn compare_field(a: &Value, b: &Value, field: &str, direction: Direction) -> Ordering {
    let ordering = match (a.get(field), b.get(field)) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(_), None) => return Ordering::Less,
        (None, Some(_)) => return Ordering::Greater,
        _ => Ordering::Equal,
    };

    match direction {
        Direction::Asc => ordering,
        Direction::Desc => ordering.reverse(),
    }
}
