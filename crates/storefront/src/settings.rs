//! Merchant settings provider.
//!
//! Settings are loaded from the backend by a background task. The app starts
//! immediately with default settings flagged as loading; pages that depend on
//! settings render their loading state until the first load attempt finishes.
//! After that the task optionally refreshes on an interval, keeping the last
//! good settings when a refresh fails.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use keystand_core::Settings;
use tracing::{error, info, instrument, warn};

use crate::backend::BackendClient;

/// Point-in-time view of the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsSnapshot {
    /// Current settings (defaults until the first successful load).
    pub settings: Settings,
    /// True until the first load attempt has finished.
    pub loading: bool,
}

/// Shared, read-mostly merchant settings.
#[derive(Clone)]
pub struct SettingsProvider {
    inner: Arc<RwLock<SettingsSnapshot>>,
}

impl Default for SettingsProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsProvider {
    /// Create a provider that has not loaded anything yet.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(SettingsSnapshot {
                settings: Settings::default(),
                loading: true,
            })),
        }
    }

    /// Create a provider that is already loaded with `settings`.
    #[must_use]
    pub fn loaded(settings: Settings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(SettingsSnapshot {
                settings,
                loading: false,
            })),
        }
    }

    /// Copy out the current settings and loading flag.
    #[must_use]
    pub fn snapshot(&self) -> SettingsSnapshot {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether the first load attempt is still pending.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .loading
    }

    /// Replace the settings and mark the provider loaded.
    pub fn store(&self, settings: Settings) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        guard.settings = settings;
        guard.loading = false;
    }

    /// Mark the provider loaded without changing its settings.
    fn finish_loading(&self) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .loading = false;
    }
}

/// Load settings once into `provider`.
///
/// Failures are logged and leave the current settings in place; the provider
/// is marked loaded either way so pages stop waiting on it.
#[instrument(skip_all)]
pub async fn refresh_settings(provider: &SettingsProvider, backend: &BackendClient) {
    match backend.get_settings().await {
        Ok(settings) => {
            if settings.whatsapp_url().is_none() {
                warn!("Merchant settings have no WhatsApp URL; contact links will be inert");
            }
            provider.store(settings);
            info!("Merchant settings loaded");
        }
        Err(e) => {
            error!(error = %e, "Failed to load merchant settings");
            provider.finish_loading();
        }
    }
}

/// Spawn the background task that loads (and optionally refreshes) settings.
pub fn load_settings_async(
    provider: SettingsProvider,
    backend: BackendClient,
    refresh: Option<Duration>,
) {
    info!(refresh = ?refresh, "Spawning settings loader");
    tokio::spawn(async move {
        refresh_settings(&provider, &backend).await;

        let Some(period) = refresh else {
            return;
        };

        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately; the initial load already ran.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            refresh_settings(&provider, &backend).await;
        }
    });
}
