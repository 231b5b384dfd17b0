// SPDX-License-Identifier: MIT

//! Activity feed and leaderboard routes.

use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{FeedActivity, FeedActivityKind, LeaderboardEntry, LeaderboardPeriod, Privacy};
use crate::response::ApiResponse;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/feed", get(get_feed).post(create_activity))
        .route("/api/leaderboard", get(get_leaderboard))
}

async fn get_feed(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<Vec<FeedActivity>>>> {
    let emails = super::friend_emails(&state, &user.email).await?;
    let activities = state
        .feed
        .get_feed_activities(&user.email, Some(&emails))
        .await?;
    Ok(ApiResponse::ok(activities))
}

#[derive(Deserialize)]
pub struct CreateActivityRequest {
    #[serde(rename = "type")]
    pub kind: FeedActivityKind,
    #[serde(default)]
    pub data: serde_json::Value,
    pub privacy: Privacy,
    pub user_name: String,
    #[serde(default)]
    pub user_picture: Option<String>,
}

async fn create_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateActivityRequest>,
) -> Result<Json<ApiResponse<FeedActivity>>> {
    let activity = FeedActivity {
        id: String::new(),
        user_id: user.email.clone(),
        user_email: user.email,
        user_name: payload.user_name,
        user_picture: payload.user_picture,
        kind: payload.kind,
        data: payload.data,
        privacy: payload.privacy,
        timestamp: 0, // stamped by the service
    };

    let activity = state.feed.create_feed_activity(activity).await?;
    Ok(ApiResponse::ok(activity))
}

#[derive(Deserialize)]
pub struct LeaderboardParams {
    #[serde(default = "default_period")]
    pub period: LeaderboardPeriod,
    /// Restrict the board to the requester's friends
    #[serde(default)]
    pub friends: bool,
}

fn default_period() -> LeaderboardPeriod {
    LeaderboardPeriod::Weekly
}

async fn get_leaderboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<LeaderboardParams>,
) -> Result<Json<ApiResponse<Vec<LeaderboardEntry>>>> {
    let friend_emails = if params.friends {
        let mut emails = super::friend_emails(&state, &user.email).await?;
        // The requester ranks alongside their friends
        emails.push(user.email.clone());
        Some(emails)
    } else {
        None
    };

    let board = state
        .feed
        .get_leaderboard(params.period, friend_emails.as_deref())
        .await?;
    Ok(ApiResponse::ok(board))
}
