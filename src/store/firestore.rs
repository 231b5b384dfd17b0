// SPDX-License-Identifier: MIT

//! Firestore backend for the persistence adapter.
//!
//! Documents are stored with their `id` field doubling as the Firestore
//! document id, so keyed lookups stay single-read and query results need no
//! id rewriting.

use crate::error::{AppError, Result};
use crate::store::{Clause, Direction, Filter, FilterValue, Order};
use serde_json::Value;

#[derive(Clone)]
pub struct FirestoreStore {
    client: firestore::FirestoreDb,
}

impl FirestoreStore {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self> {
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self { client })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self { client })
    }

    pub async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        order: Option<&Order>,
        limit: Option<u32>,
    ) -> Result<Vec<Value>> {
        let clauses = filter.clauses().to_vec();
        let query = self
            .client
            .fluent()
            .select()
            .from(collection)
            .filter(move |q| {
                let conditions: Vec<_> = clauses
                    .iter()
                    .map(|clause| match clause {
                        Clause::Eq(field, FilterValue::Str(v)) => {
                            q.field(field.clone()).eq(v.clone())
                        }
                        Clause::Eq(field, FilterValue::Int(v)) => q.field(field.clone()).eq(*v),
                        Clause::Eq(field, FilterValue::Bool(v)) => q.field(field.clone()).eq(*v),
                        Clause::In(field, values) => q.field(field.clone()).is_in(values.clone()),
                        Clause::Gte(field, min) => {
                            q.field(field.clone()).greater_than_or_equal(*min)
                        }
                        Clause::Lt(field, max) => q.field(field.clone()).less_than(*max),
                    })
                    .collect();
                q.for_all(conditions)
            });

        let query = if let Some(order) = order {
            let direction = match order.direction {
                Direction::Asc => firestore::FirestoreQueryDirection::Ascending,
                Direction::Desc => firestore::FirestoreQueryDirection::Descending,
            };
            query.order_by([(order.field.clone(), direction)])
        } else {
            query
        };

        let query = if let Some(limit) = limit {
            query.limit(limit)
        } else {
            query
        };

        query
            .obj::<Value>()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>> {
        self.client
            .fluent()
            .select()
            .by_id_in(collection)
            .obj::<Value>()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a new document; fails if the id is taken.
    pub async fn create(&self, collection: &str, id: &str, doc: &Value) -> Result<()> {
        let _: Value = self
            .client
            .fluent()
            .insert()
            .into(collection)
            .document_id(id)
            .object(doc)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Conditional insert: `Ok(false)` when the document already exists.
    pub async fn create_if_absent(&self, collection: &str, id: &str, doc: &Value) -> Result<bool> {
        let result: std::result::Result<Value, _> = self
            .client
            .fluent()
            .insert()
            .into(collection)
            .document_id(id)
            .object(doc)
            .execute()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(e) => {
                let message = e.to_string();
                // Firestore rejects CreateDocument on an existing id; that is
                // the uniqueness signal, not a fault.
                if message.contains("AlreadyExists") || message.contains("already exists") {
                    Ok(false)
                } else {
                    Err(AppError::Database(message))
                }
            }
        }
    }

    /// Merge only the patch's top-level fields into an existing document.
    pub async fn merge(&self, collection: &str, id: &str, patch: &Value) -> Result<bool> {
        // Existence check first so a missing target reports as unmatched
        // rather than being created by the merge.
        if self.get(collection, id).await?.is_none() {
            return Ok(false);
        }

        let fields: Vec<String> = patch
            .as_object()
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default();

        let _: Value = self
            .client
            .fluent()
            .update()
            .fields(fields)
            .in_col(collection)
            .document_id(id)
            .object(patch)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(true)
    }

    /// Create-or-replace the document at the given id.
    pub async fn set(&self, collection: &str, id: &str, doc: &Value) -> Result<()> {
        let _: Value = self
            .client
            .fluent()
            .update()
            .in_col(collection)
            .document_id(id)
            .object(doc)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    pub async fn remove(&self, collection: &str, id: &str) -> Result<u64> {
        if self.get(collection, id).await?.is_none() {
            return Ok(0);
        }

        self.client
            .fluent()
            .delete()
            .from(collection)
            .document_id(id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(1)
    }
}
