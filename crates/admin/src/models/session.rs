//! Session-related types for admin authentication.
//!
//! Types stored in the session for authentication state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Session-stored admin identity.
///
/// Its presence in the session is what makes the panel show the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Login name the admin signed in with.
    pub username: String,
    /// When the login succeeded.
    pub logged_in_at: DateTime<Utc>,
}

impl CurrentAdmin {
    /// Identity for an admin who just signed in.
    #[must_use]
    pub fn signed_in_now(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            logged_in_at: Utc::now(),
        }
    }
}

/// Session keys for admin authentication data.
pub mod keys {
    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";
}
