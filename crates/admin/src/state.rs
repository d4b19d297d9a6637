//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::AdminCredentials;

/// Shared application state.
///
/// Cheap to clone: wraps an `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    credentials: AdminCredentials,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(credentials: AdminCredentials) -> Self {
        Self {
            inner: Arc::new(AppStateInner { credentials }),
        }
    }

    /// The admin account checked by the login form.
    #[must_use]
    pub fn credentials(&self) -> &AdminCredentials {
        &self.inner.credentials
    }
}
