// SPDX-License-Identifier: MIT

//! User profile and display-name routes.

use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::User;
use crate::response::ApiResponse;
use crate::services::identity::DisplayNameEntry;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route(
            "/api/me/display-name",
            get(get_display_name).put(update_display_name),
        )
        .route("/api/users/display-names", post(batch_display_names))
}

async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<User>>> {
    let me = state
        .identity
        .get_user(&user.email)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.email)))?;
    Ok(ApiResponse::ok(me))
}

#[derive(Serialize)]
pub struct DisplayNameStatus {
    pub display_name: String,
    pub can_change: bool,
}

async fn get_display_name(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<DisplayNameStatus>>> {
    let display_name = state.identity.get_display_name(&user.email).await?;
    let can_change = state.identity.can_change_display_name(&user.email).await?;
    Ok(ApiResponse::ok(DisplayNameStatus {
        display_name,
        can_change,
    }))
}

#[derive(Deserialize)]
pub struct UpdateDisplayNameRequest {
    pub display_name: String,
}

async fn update_display_name(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<UpdateDisplayNameRequest>,
) -> Result<Json<ApiResponse<User>>> {
    let updated = state
        .identity
        .update_display_name(&user.email, &payload.display_name)
        .await?;
    Ok(ApiResponse::ok(updated))
}

#[derive(Deserialize)]
pub struct BatchDisplayNamesRequest {
    pub emails: Vec<String>,
}

async fn batch_display_names(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<BatchDisplayNamesRequest>,
) -> Result<Json<ApiResponse<HashMap<String, DisplayNameEntry>>>> {
    let names = state
        .identity
        .get_batch_display_names(&payload.emails)
        .await?;
    Ok(ApiResponse::ok(names))
}
