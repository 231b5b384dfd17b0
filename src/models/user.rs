//! User model for storage and API.

use serde::{Deserialize, Serialize};

/// User profile, keyed by email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: String,
    /// Email address (uniqueness key)
    pub email: String,
    /// Name from the identity provider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// User-chosen display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Profile picture URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    /// Whether the one-time display-name change has been used
    #[serde(default)]
    pub has_changed_name: bool,
    /// Unix seconds
    pub created_at: i64,
    /// Unix seconds
    pub last_login_at: i64,
}
