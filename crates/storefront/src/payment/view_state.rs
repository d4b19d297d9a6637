//! Fetch lifecycle of the barcode payment page.
//!
//! A page activation starts in [`ViewState::Loading`], issues one fetch per
//! distinct product id, and resolves to exactly one of `Error` or `Ready` per
//! fetch. Every fetch carries a [`FetchTicket`]; only the latest ticket may
//! resolve, so a slow response for an old id can never overwrite the state of
//! a newer one.

use keystand_core::{Product, ProductId};
use tracing::{debug, error};

use crate::backend::BackendError;

/// Shown when the product exists but has no payment QR image.
pub const NOT_ELIGIBLE_MESSAGE: &str = "Barcode payment is not available for this product.";

/// Shown when the lookup fails without a message of its own.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to load product details.";

/// Shown when the route carries no product id.
pub const MISSING_PRODUCT_MESSAGE: &str = "No product was specified.";

/// What the payment page currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ViewState {
    /// A fetch is in flight (or none could start yet).
    #[default]
    Loading,
    /// Terminal failure with a user-facing message.
    Error(String),
    /// Terminal success with a barcode-eligible product.
    Ready(Product),
}

impl ViewState {
    /// Derive the resolved state from a lookup outcome.
    ///
    /// A product without a QR image is rejected even though the lookup
    /// succeeded. A failure's user message is surfaced unless it is empty;
    /// internal failures are logged and replaced by the fallback.
    pub fn from_fetch(outcome: Result<Product, BackendError>) -> Self {
        match outcome {
            Ok(product) if product.accepts_barcode_payment() => Self::Ready(product),
            Ok(_) => Self::Error(NOT_ELIGIBLE_MESSAGE.to_string()),
            Err(e) => match e.user_message() {
                Some(message) if !message.is_empty() => Self::Error(message.to_string()),
                Some(_) => Self::Error(FETCH_FAILED_MESSAGE.to_string()),
                None => {
                    error!(error = %e, "Product lookup failed");
                    Self::Error(FETCH_FAILED_MESSAGE.to_string())
                }
            },
        }
    }

    /// Whether the state is still `Loading`.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Sequence number of one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// Transient state owned by one payment page activation.
#[derive(Debug, Default)]
pub struct PaymentLifecycle {
    state: ViewState,
    product_id: Option<ProductId>,
    latest: u64,
}

impl PaymentLifecycle {
    /// A fresh activation, in `Loading`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &ViewState {
        &self.state
    }

    /// The product id the latest fetch is for.
    #[must_use]
    pub const fn product_id(&self) -> Option<&ProductId> {
        self.product_id.as_ref()
    }

    /// Point the activation at a (possibly new) product id.
    ///
    /// Returns a ticket when a fetch must start: on the first id and whenever
    /// the id changes. The same id again starts nothing. A missing id
    /// invalidates any in-flight fetch and resolves immediately to an error.
    pub fn set_product_id(&mut self, id: Option<ProductId>) -> Option<FetchTicket> {
        match id {
            None => {
                self.latest += 1;
                self.product_id = None;
                self.state = ViewState::Error(MISSING_PRODUCT_MESSAGE.to_string());
                None
            }
            Some(id) if self.product_id.as_ref() == Some(&id) => None,
            Some(id) => {
                self.latest += 1;
                self.product_id = Some(id);
                self.state = ViewState::Loading;
                Some(FetchTicket(self.latest))
            }
        }
    }

    /// Apply a fetch outcome.
    ///
    /// Returns `false` (and leaves the state untouched) when the ticket is
    /// stale or its fetch already resolved.
    pub fn resolve(&mut self, ticket: FetchTicket, outcome: Result<Product, BackendError>) -> bool {
        if ticket.0 != self.latest || !self.state.is_loading() {
            debug!(
                ticket = ticket.0,
                latest = self.latest,
                "Dropping stale product fetch result"
            );
            return false;
        }
        self.state = ViewState::from_fetch(outcome);
        true
    }

    /// Consume the activation, returning its final state.
    #[must_use]
    pub fn into_state(self) -> ViewState {
        self.state
    }
}
