// SPDX-License-Identifier: MIT

//! Geotagged entry model ("poop").

use serde::{Deserialize, Serialize};

/// Visibility scope of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
    /// Owner only
    Private,
    /// Owner plus accepted friends
    Friends,
    /// Anyone
    Public,
}

impl Privacy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Privacy::Private => "private",
            Privacy::Friends => "friends",
            Privacy::Public => "public",
        }
    }
}

/// A single geotagged user-submitted record.
///
/// Owned exclusively by `user_id`; comments and likes reference it by id and
/// are intentionally not cascade-deleted with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Poop {
    #[serde(default)]
    pub id: String,
    pub user_id: String,
    pub lat: f64,
    pub lng: f64,
    /// Unix seconds
    pub timestamp: i64,
    /// Experience rating, 0-5 in half steps
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Photo as a data URL / base64 payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    pub privacy: Privacy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}
