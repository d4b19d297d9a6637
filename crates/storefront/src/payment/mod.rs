//! Barcode payment page.
//!
//! The customer opens `/pay/{product_id}`, scans the product's payment QR
//! code, pays outside the store, then sends the receipt over WhatsApp. This
//! module owns everything between the route and the template:
//!
//! - [`view_state`] - the Loading / Error / Ready fetch lifecycle
//! - [`whatsapp`] - the receipt deep link
//! - [`PaymentView`] - what the page renders, combining both with the
//!   merchant settings' loading state

pub mod view_state;
pub mod whatsapp;

use keystand_core::{Product, ProductId};

pub use view_state::{PaymentLifecycle, ViewState};
pub use whatsapp::whatsapp_link;

use crate::backend::ProductLookup;
use crate::settings::SettingsSnapshot;

/// Fetch the product for one page activation and return its resolved state.
///
/// Without an id the fetch never starts and the state is an error.
pub async fn load_payment_state<L: ProductLookup>(
    lookup: &L,
    product_id: Option<ProductId>,
) -> ViewState {
    let mut lifecycle = PaymentLifecycle::new();

    let Some(ticket) = lifecycle.set_product_id(product_id) else {
        return lifecycle.into_state();
    };
    let Some(id) = lifecycle.product_id().cloned() else {
        return lifecycle.into_state();
    };

    let outcome = lookup.product_by_id(&id).await;
    lifecycle.resolve(ticket, outcome);
    lifecycle.into_state()
}

/// What the payment page renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentView {
    /// Spinner; settings or product still loading.
    Loading,
    /// Blocking error card.
    Error {
        /// User-facing message.
        message: String,
    },
    /// Payment instructions for an eligible product.
    Ready {
        /// The product being paid for.
        product: Product,
        /// Receipt deep link, `#` when unavailable.
        whatsapp_link: String,
    },
}

impl PaymentView {
    /// Combine the product state with the settings snapshot.
    ///
    /// Loading settings win over any product state. The deep link is derived
    /// here on every call, never stored.
    #[must_use]
    pub fn derive(state: ViewState, settings: &SettingsSnapshot) -> Self {
        if settings.loading {
            return Self::Loading;
        }
        match state {
            ViewState::Loading => Self::Loading,
            ViewState::Error(message) => Self::Error { message },
            ViewState::Ready(product) => {
                let whatsapp_link = whatsapp_link(Some(&product), &settings.settings);
                Self::Ready {
                    product,
                    whatsapp_link,
                }
            }
        }
    }
}
