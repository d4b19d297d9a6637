//! Merchant-wide settings.

use serde::{Deserialize, Serialize};

/// Merchant configuration shared read-only by every storefront page.
///
/// Loaded from the backend's `settings` table. Every field is optional so a
/// missing or partially filled row still deserializes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// WhatsApp contact URL carrying the merchant's number in its `phone`
    /// query parameter, e.g. `https://wa.me/?phone=15551234567`.
    #[serde(default)]
    pub whatsapp_url: Option<String>,
    /// Store name shown in page headers.
    #[serde(default)]
    pub store_name: Option<String>,
}

impl Settings {
    /// Default store name when none is configured.
    pub const DEFAULT_STORE_NAME: &'static str = "Keystand";

    /// The configured WhatsApp URL, treating blank values as absent.
    #[must_use]
    pub fn whatsapp_url(&self) -> Option<&str> {
        self.whatsapp_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Store name for display.
    #[must_use]
    pub fn store_name(&self) -> &str {
        self.store_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(Self::DEFAULT_STORE_NAME)
    }
}
