//! Application state shared across handlers.

use std::sync::Arc;

use crate::backend::BackendClient;
use crate::settings::SettingsProvider;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    backend: BackendClient,
    settings: SettingsProvider,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(backend: BackendClient, settings: SettingsProvider) -> Self {
        Self {
            inner: Arc::new(AppStateInner { backend, settings }),
        }
    }

    /// Get a reference to the backend client.
    #[must_use]
    pub fn backend(&self) -> &BackendClient {
        &self.inner.backend
    }

    /// Get a reference to the merchant settings provider.
    #[must_use]
    pub fn settings(&self) -> &SettingsProvider {
        &self.inner.settings
    }
}
