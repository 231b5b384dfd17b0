// SPDX-License-Identifier: MIT

//! Session issuance.
//!
//! The client authenticates with its identity provider and posts the
//! resulting profile here; the server trusts it, upserts the user, and
//! issues an HS256 session JWT.

use axum::{extract::State, routing::post, Json, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, SESSION_COOKIE};
use crate::models::User;
use crate::response::ApiResponse;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/auth/session", post(create_session))
}

#[derive(Deserialize, Validate)]
pub struct SessionRequest {
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: User,
}

async fn create_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<SessionRequest>,
) -> Result<(CookieJar, Json<ApiResponse<SessionResponse>>)> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let user = state
        .identity
        .get_or_create_user(&payload.email, payload.name, payload.picture)
        .await?;

    let token = create_jwt(&user.email, &state.config.jwt_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    let cookie = Cookie::build((SESSION_COOKIE, token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    tracing::info!(email = %user.email, "Session created");

    Ok((
        jar.add(cookie),
        ApiResponse::ok(SessionResponse { token, user }),
    ))
}
