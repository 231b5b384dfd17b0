// SPDX-License-Identifier: MIT

//! Likes and comments on entries.

use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Comment, Like, PoopInteractions};
use crate::response::ApiResponse;
use crate::time_utils::now_unix;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/poops/{id}/likes", post(add_like).delete(remove_like))
        .route("/api/poops/{id}/comments", post(add_comment))
        .route("/api/poops/{id}/interactions", get(get_interactions))
        .route("/api/comments/{id}", delete(delete_comment))
}

#[derive(Deserialize)]
pub struct LikeRequest {
    pub user_name: String,
    #[serde(default)]
    pub user_picture: Option<String>,
}

async fn add_like(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(poop_id): Path<String>,
    Json(payload): Json<LikeRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>> {
    let like = Like {
        id: String::new(),
        poop_id,
        user_id: user.email.clone(),
        user_email: user.email,
        user_name: payload.user_name,
        user_picture: payload.user_picture,
        timestamp: now_unix(),
        created_at: String::new(),
        updated_at: String::new(),
    };

    let id = state.interactions.add_like(like).await?;
    Ok(ApiResponse::ok(serde_json::json!({ "id": id })))
}

async fn remove_like(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(poop_id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>> {
    let deleted = state.interactions.remove_like(&poop_id, &user.email).await?;
    Ok(ApiResponse::ok(serde_json::json!({ "deleted": deleted })))
}

#[derive(Deserialize, Validate)]
pub struct CommentRequest {
    #[validate(length(min = 1, max = 500))]
    pub content: String,
    pub user_name: String,
    #[serde(default)]
    pub user_picture: Option<String>,
}

async fn add_comment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(poop_id): Path<String>,
    Json(payload): Json<CommentRequest>,
) -> Result<Json<ApiResponse<Comment>>> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let comment = Comment {
        id: String::new(),
        poop_id,
        user_id: user.email.clone(),
        user_email: user.email,
        user_name: payload.user_name,
        user_picture: payload.user_picture,
        content: payload.content,
        timestamp: now_unix(),
        created_at: String::new(),
        updated_at: String::new(),
    };

    let comment = state.interactions.add_comment(comment).await?;
    Ok(ApiResponse::ok(comment))
}

async fn delete_comment(
    State(state): State<Arc<AppState>>,
    Path(comment_id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>> {
    state.interactions.delete_comment(&comment_id).await?;
    Ok(ApiResponse::ok(serde_json::json!({ "deleted": comment_id })))
}

async fn get_interactions(
    State(state): State<Arc<AppState>>,
    Path(poop_id): Path<String>,
) -> Result<Json<ApiResponse<PoopInteractions>>> {
    let interactions = state.interactions.get_poop_interactions(&poop_id).await?;
    Ok(ApiResponse::ok(interactions))
}
