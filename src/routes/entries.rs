// SPDX-License-Identifier: MIT

//! Entry CRUD and scope queries.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Poop, Privacy};
use crate::response::ApiResponse;
use crate::services::entries::PoopUpdate;
use crate::time_utils::now_unix;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/poops", post(create_poop).get(list_poops))
        .route(
            "/api/poops/{id}",
            get(get_poop).put(update_poop).delete(delete_poop),
        )
}

#[derive(Deserialize, Validate)]
pub struct CreatePoopRequest {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
    /// Unix seconds; defaults to now
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[validate(range(min = 0.0, max = 5.0))]
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
    pub privacy: Privacy,
    #[serde(default)]
    pub place_name: Option<String>,
    #[serde(default)]
    pub custom_location: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

async fn create_poop(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreatePoopRequest>,
) -> Result<Json<ApiResponse<Poop>>> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let poop = Poop {
        id: String::new(),
        user_id: user.email,
        lat: payload.lat,
        lng: payload.lng,
        timestamp: payload.timestamp.unwrap_or_else(now_unix),
        rating: payload.rating,
        notes: payload.notes,
        photo: payload.photo,
        privacy: payload.privacy,
        place_name: payload.place_name,
        custom_location: payload.custom_location,
        address: payload.address,
        created_at: String::new(),
        updated_at: String::new(),
    };

    let poop = state.entries.create_poop(poop).await?;
    Ok(ApiResponse::ok(poop))
}

/// Which slice of entries to list.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoopScope {
    #[default]
    Mine,
    Public,
    Friends,
}

#[derive(Deserialize)]
pub struct ListPoopsParams {
    #[serde(default)]
    pub scope: PoopScope,
}

async fn list_poops(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<ListPoopsParams>,
) -> Result<Json<ApiResponse<Vec<Poop>>>> {
    let poops = match params.scope {
        PoopScope::Mine => state.entries.get_user_poops(&user.email).await?,
        PoopScope::Public => state.feed.get_public_poops().await?,
        PoopScope::Friends => {
            let emails = super::friend_emails(&state, &user.email).await?;
            state.feed.get_friends_poops(&emails).await?
        }
    };
    Ok(ApiResponse::ok(poops))
}

async fn get_poop(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Poop>>> {
    let poop = state
        .entries
        .get_poop(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Entry {} not found", id)))?;
    Ok(ApiResponse::ok(poop))
}

#[derive(Deserialize, Validate)]
pub struct UpdatePoopRequest {
    #[validate(range(min = 0.0, max = 5.0))]
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub privacy: Option<Privacy>,
}

async fn update_poop(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdatePoopRequest>,
) -> Result<Json<ApiResponse<Poop>>> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    state
        .entries
        .update_poop(
            &id,
            PoopUpdate {
                rating: payload.rating,
                notes: payload.notes,
                privacy: payload.privacy,
            },
        )
        .await?;

    let poop = state
        .entries
        .get_poop(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Entry {} not found", id)))?;
    Ok(ApiResponse::ok(poop))
}

async fn delete_poop(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>> {
    state.entries.delete_poop(&id).await?;
    Ok(ApiResponse::ok(serde_json::json!({ "deleted": id })))
}
