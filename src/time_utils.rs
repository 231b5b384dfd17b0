//! Small time helpers shared by services.

/// Current time as unix seconds.
pub fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Current time as an RFC3339 string (created_at/updated_at fields).
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}
