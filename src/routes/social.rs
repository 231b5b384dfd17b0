// SPDX-License-Identifier: MIT

//! Friends and friend requests.

use axum::{
    extract::{Path, State},
    routing::{get, put},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Friend, FriendRequest, FriendStatus};
use crate::response::ApiResponse;
use crate::time_utils::now_unix;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/friends", get(list_friends).post(add_friend))
        .route("/api/friends/{email}", axum::routing::delete(remove_friend))
        .route(
            "/api/friend-requests",
            get(list_friend_requests).post(send_friend_request),
        )
        .route("/api/friend-requests/{id}", put(update_friend_request))
}

async fn list_friends(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<Vec<Friend>>>> {
    let friends = state.social.get_user_friends(&user.email).await?;
    Ok(ApiResponse::ok(friends))
}

#[derive(Deserialize, Validate)]
pub struct AddFriendRequest {
    #[validate(email)]
    pub friend_email: String,
    pub friend_name: String,
    #[serde(default)]
    pub friend_picture: Option<String>,
    #[serde(default = "default_friend_status")]
    pub status: FriendStatus,
}

fn default_friend_status() -> FriendStatus {
    FriendStatus::Accepted
}

async fn add_friend(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<AddFriendRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let friend = Friend {
        id: String::new(),
        user_id: user.email,
        friend_email: payload.friend_email,
        friend_name: payload.friend_name,
        friend_picture: payload.friend_picture,
        status: payload.status,
        added_at: now_unix(),
    };

    let id = state.social.add_friend(friend).await?;
    Ok(ApiResponse::ok(serde_json::json!({ "id": id })))
}

async fn remove_friend(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(friend_email): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>> {
    let deleted = state.social.remove_friend(&user.email, &friend_email).await?;
    Ok(ApiResponse::ok(serde_json::json!({ "deleted": deleted })))
}

async fn list_friend_requests(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<Vec<FriendRequest>>>> {
    let requests = state.social.get_friend_requests(&user.email).await?;
    Ok(ApiResponse::ok(requests))
}

#[derive(Deserialize, Validate)]
pub struct SendFriendRequest {
    #[validate(email)]
    pub to_user_email: String,
    pub from_user_name: String,
    #[serde(default)]
    pub from_user_picture: Option<String>,
}

async fn send_friend_request(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<SendFriendRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let request = FriendRequest {
        id: String::new(),
        from_user_id: user.email.clone(),
        from_user_name: payload.from_user_name,
        from_user_email: user.email,
        from_user_picture: payload.from_user_picture,
        to_user_email: payload.to_user_email,
        status: FriendStatus::Pending,
        timestamp: now_unix(),
        created_at: String::new(),
        updated_at: String::new(),
    };

    let id = state.social.send_friend_request(request).await?;
    Ok(ApiResponse::ok(serde_json::json!({ "id": id })))
}

#[derive(Deserialize)]
pub struct UpdateFriendRequest {
    pub status: FriendStatus,
}

async fn update_friend_request(
    State(state): State<Arc<AppState>>,
    Path(request_id): Path<String>,
    Json(payload): Json<UpdateFriendRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>> {
    state
        .social
        .update_friend_request_status(&request_id, payload.status)
        .await?;
    Ok(ApiResponse::ok(serde_json::json!({ "id": request_id })))
}
