//! Client for the hosted backend's REST interface.
//!
//! # Architecture
//!
//! - The backend (a PostgREST-style API) is the source of truth for products
//!   and merchant settings - NO local copy, direct API calls
//! - In-memory caching via `moka` for product lookups (60 second TTL)
//! - Read-only: the storefront never writes to the backend
//!
//! # Example
//!
//! ```rust,ignore
//! use keystand_storefront::backend::{BackendClient, ProductLookup};
//!
//! let client = BackendClient::new(&config.backend)?;
//! let product = client.product_by_id(&product_id).await?;
//! ```

mod client;

pub use client::{BackendClient, ProductLookup};

use keystand_core::ProductId;
use serde::Deserialize;
use thiserror::Error;

/// Shown for a product id the backend does not know.
pub const NOT_FOUND_MESSAGE: &str = "Product not found.";

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// No product exists with this id.
    #[error("{}", NOT_FOUND_MESSAGE)]
    NotFound(ProductId),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The backend rejected the request. The message comes verbatim from the
    /// response body and may be empty.
    #[error("{message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Error message reported by the backend.
        message: String,
    },
}

impl BackendError {
    /// Message fit for a customer-facing page.
    ///
    /// `None` for transport, decoding and rate-limit failures, whose text
    /// carries request URLs and parser internals.
    #[must_use]
    pub fn user_message(&self) -> Option<&str> {
        match self {
            Self::NotFound(_) => Some(NOT_FOUND_MESSAGE),
            Self::Rejected { message, .. } => Some(message),
            Self::Http(_) | Self::Parse(_) | Self::RateLimited(_) => None,
        }
    }
}

/// Error body returned by the backend on non-success responses.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

impl ErrorBody {
    /// Parse a response body, tolerating non-JSON bodies.
    pub(crate) fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }
}
