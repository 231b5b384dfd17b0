// SPDX-License-Identifier: MIT

//! Gameplay routes: inventory, attacks, achievements, challenges,
//! notifications.

use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::gameplay::{
    ChallengeKind, ChallengeReward, ChallengeStatus, ItemKind, NotificationKind,
    NotificationPriority, Rarity,
};
use crate::models::{Achievement, Attack, Challenge, Inventory, Item, Notification};
use crate::response::ApiResponse;
use crate::time_utils::now_unix;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/inventory", get(get_inventory))
        .route("/api/inventory/items", post(add_item))
        .route("/api/inventory/items/{id}/use", post(use_item))
        .route("/api/attacks", get(list_attacks).post(create_attack))
        .route("/api/attacks/unviewed", get(list_unviewed_attacks))
        .route("/api/attacks/{id}/viewed", put(mark_attack_viewed))
        .route("/api/attacks/cleanup", post(cleanup_attacks))
        .route(
            "/api/achievements",
            get(list_achievements).post(unlock_achievement),
        )
        .route("/api/challenges", get(list_challenges).post(create_challenge))
        .route("/api/challenges/{id}/progress", put(update_progress))
        .route(
            "/api/notifications",
            get(list_notifications).post(create_notification),
        )
        .route("/api/notifications/{id}/read", put(mark_notification_read))
}

// ─── Inventory ───────────────────────────────────────────────────

async fn get_inventory(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<Inventory>>> {
    let inventory = state.gameplay.get_user_inventory(&user.email).await?;
    Ok(ApiResponse::ok(inventory))
}

#[derive(Deserialize)]
pub struct AddItemRequest {
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub rarity: Rarity,
}

async fn add_item(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<AddItemRequest>,
) -> Result<Json<ApiResponse<Inventory>>> {
    let item = Item {
        id: uuid::Uuid::new_v4().to_string(),
        kind: payload.kind,
        name: payload.name,
        description: payload.description,
        icon: payload.icon,
        rarity: payload.rarity,
        obtained_at: now_unix(),
    };

    let inventory = state
        .gameplay
        .add_item_to_inventory(&user.email, item)
        .await?;
    Ok(ApiResponse::ok(inventory))
}

async fn use_item(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(item_id): Path<String>,
) -> Result<Json<ApiResponse<Item>>> {
    let item = state.gameplay.use_item(&user.email, &item_id).await?;
    Ok(ApiResponse::ok(item))
}

// ─── Attacks ─────────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct CreateAttackRequest {
    #[validate(email)]
    pub to_user_email: String,
    pub from_user_name: String,
    #[serde(default)]
    pub from_user_picture: Option<String>,
    pub item_used: Item,
    #[serde(default)]
    pub message: Option<String>,
}

async fn create_attack(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateAttackRequest>,
) -> Result<Json<ApiResponse<Attack>>> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let attack = Attack {
        id: String::new(),
        from_user_id: user.email.clone(),
        from_user_name: payload.from_user_name,
        from_user_email: user.email,
        from_user_picture: payload.from_user_picture,
        to_user_id: payload.to_user_email.clone(),
        to_user_email: payload.to_user_email,
        item_used: payload.item_used,
        message: payload.message,
        timestamp: now_unix(),
        viewed: false,
    };

    let attack = state.gameplay.create_attack(attack).await?;
    Ok(ApiResponse::ok(attack))
}

async fn list_attacks(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<Vec<Attack>>>> {
    let attacks = state.gameplay.get_user_attacks(&user.email).await?;
    Ok(ApiResponse::ok(attacks))
}

async fn list_unviewed_attacks(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<Vec<Attack>>>> {
    let attacks = state.gameplay.get_unviewed_attacks(&user.email).await?;
    Ok(ApiResponse::ok(attacks))
}

async fn mark_attack_viewed(
    State(state): State<Arc<AppState>>,
    Path(attack_id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>> {
    state.gameplay.mark_attack_viewed(&attack_id).await?;
    Ok(ApiResponse::ok(serde_json::json!({ "id": attack_id })))
}

async fn cleanup_attacks(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<serde_json::Value>>> {
    let deleted = state.gameplay.cleanup_old_attacks(&user.email).await?;
    Ok(ApiResponse::ok(serde_json::json!({ "deleted": deleted })))
}

// ─── Achievements ────────────────────────────────────────────────

async fn list_achievements(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<Vec<Achievement>>>> {
    let achievements = state.gameplay.get_user_achievements(&user.email).await?;
    Ok(ApiResponse::ok(achievements))
}

#[derive(Deserialize)]
pub struct UnlockAchievementRequest {
    pub achievement_id: String,
    #[serde(default)]
    pub progress: Option<f64>,
}

async fn unlock_achievement(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<UnlockAchievementRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>> {
    let id = state
        .gameplay
        .unlock_achievement(&user.email, &payload.achievement_id, payload.progress)
        .await?;
    Ok(ApiResponse::ok(serde_json::json!({ "id": id })))
}

// ─── Challenges ──────────────────────────────────────────────────

async fn list_challenges(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<Vec<Challenge>>>> {
    let challenges = state.gameplay.get_challenges(Some(&user.email)).await?;
    Ok(ApiResponse::ok(challenges))
}

#[derive(Deserialize, Validate)]
pub struct CreateChallengeRequest {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: ChallengeKind,
    #[validate(range(min = 1))]
    pub target: i64,
    /// Window length in seconds
    #[validate(range(min = 1))]
    pub duration: i64,
    pub created_by_name: String,
    pub participants: Vec<String>,
}

async fn create_challenge(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateChallengeRequest>,
) -> Result<Json<ApiResponse<Challenge>>> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let mut participants = payload.participants;
    if !participants.iter().any(|p| p == &user.email) {
        participants.push(user.email.clone());
    }

    let challenge = Challenge {
        id: String::new(),
        title: payload.title,
        description: payload.description,
        kind: payload.kind,
        target: payload.target,
        duration: payload.duration,
        created_by: user.email,
        created_by_name: payload.created_by_name,
        participants,
        // start/end/status/reward are stamped by the service
        start_time: 0,
        end_time: 0,
        status: ChallengeStatus::Active,
        reward: ChallengeReward {
            kind: String::new(),
            value: 0,
        },
    };

    let challenge = state.gameplay.create_challenge(challenge).await?;
    Ok(ApiResponse::ok(challenge))
}

#[derive(Deserialize)]
pub struct UpdateProgressRequest {
    pub progress: i64,
}

async fn update_progress(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(challenge_id): Path<String>,
    Json(payload): Json<UpdateProgressRequest>,
) -> Result<Json<ApiResponse<Option<String>>>> {
    let record_id = state
        .gameplay
        .update_challenge_progress(&challenge_id, &user.email, payload.progress)
        .await?;
    Ok(ApiResponse::ok(record_id))
}

// ─── Notifications ───────────────────────────────────────────────

async fn list_notifications(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<Vec<Notification>>>> {
    let notifications = state.gameplay.get_user_notifications(&user.email).await?;
    Ok(ApiResponse::ok(notifications))
}

#[derive(Deserialize)]
pub struct CreateNotificationRequest {
    /// Recipient; notifications routinely target other users
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub icon: String,
    pub priority: NotificationPriority,
    #[serde(default)]
    pub action_url: Option<String>,
    #[serde(default)]
    pub data: serde_json::Value,
}

async fn create_notification(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateNotificationRequest>,
) -> Result<Json<ApiResponse<Notification>>> {
    let notification = Notification {
        id: String::new(),
        user_id: payload.user_id,
        kind: payload.kind,
        title: payload.title,
        message: payload.message,
        icon: payload.icon,
        priority: payload.priority,
        action_url: payload.action_url,
        data: payload.data,
        timestamp: 0, // stamped by the service
        read: false,
    };

    let notification = state.gameplay.create_notification(notification).await?;
    Ok(ApiResponse::ok(notification))
}

async fn mark_notification_read(
    State(state): State<Arc<AppState>>,
    Path(notification_id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>> {
    state
        .gameplay
        .mark_notification_read(&notification_id)
        .await?;
    Ok(ApiResponse::ok(serde_json::json!({ "id": notification_id })))
}
