//! Product records as returned by the hosted backend.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// A sellable digital product (a license or product key).
///
/// Read-only on this side; the backend owns the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Backend identifier.
    pub id: ProductId,
    /// Display title, also used in the purchase message.
    pub title: String,
    /// Price in the store currency.
    pub price: Price,
    /// Optional long description.
    #[serde(default)]
    pub description: Option<String>,
    /// Optional product image shown on listings.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Payment QR code image. Products without one cannot be paid by barcode.
    #[serde(default)]
    pub barcode_image_url: Option<String>,
}

impl Product {
    /// The payment QR image URL, if the product has one.
    ///
    /// An empty string counts as absent.
    #[must_use]
    pub fn barcode_image(&self) -> Option<&str> {
        self.barcode_image_url
            .as_deref()
            .filter(|url| !url.is_empty())
    }

    /// Whether the product is eligible for the barcode payment flow.
    #[must_use]
    pub fn accepts_barcode_payment(&self) -> bool {
        self.barcode_image().is_some()
    }
}
