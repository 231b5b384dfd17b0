// SPDX-License-Identifier: MIT

//! Success envelope shared by all API responses.

use serde::Serialize;

/// Standard success body: `{"success": true, "data": ...}`.
///
/// Errors use the mirror shape in [`crate::error`] with `success: false`.
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> axum::Json<Self> {
        axum::Json(Self {
            success: true,
            data,
        })
    }
}
