//! Barcode payment route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use keystand_core::{ProductId, ProductIdError};
use tracing::instrument;

use crate::backend::NOT_FOUND_MESSAGE;
use crate::error::add_breadcrumb;
use crate::payment::{PaymentView, ViewState, load_payment_state};
use crate::state::AppState;

/// Seconds between automatic reloads of the loading page.
const LOADING_REFRESH_SECS: u32 = 2;

/// Shown while settings (or the product) are loading.
#[derive(Template, WebTemplate)]
#[template(path = "payment/loading.html")]
pub struct PaymentLoadingTemplate {
    pub store_name: String,
    pub refresh_secs: u32,
}

/// Blocking error card.
#[derive(Template, WebTemplate)]
#[template(path = "payment/error.html")]
pub struct PaymentErrorTemplate {
    pub store_name: String,
    pub message: String,
}

/// Payment instructions for an eligible product.
#[derive(Template, WebTemplate)]
#[template(path = "payment/ready.html")]
pub struct PaymentReadyTemplate {
    pub store_name: String,
    pub title: String,
    pub price: String,
    pub barcode_image_url: String,
    pub whatsapp_link: String,
}

/// Display the payment page for a product.
///
/// GET /pay/{product_id}
pub async fn show(State(state): State<AppState>, Path(product_id): Path<String>) -> Response {
    render(&state, Some(&product_id)).await
}

/// Display the payment page when the route carries no product.
///
/// GET /pay
pub async fn missing(State(state): State<AppState>) -> Response {
    render(&state, None).await
}

#[instrument(skip_all, fields(product_id = raw_id))]
async fn render(state: &AppState, raw_id: Option<&str>) -> Response {
    let settings = state.settings().snapshot();
    let store_name = settings.settings.store_name().to_string();

    if let Some(id) = raw_id {
        add_breadcrumb(
            "payment",
            "Viewed barcode payment page",
            Some(&[("product_id", id)]),
        );
    }

    // Settings gate the whole page; don't hit the backend until they're in.
    let view_state = if settings.loading {
        ViewState::Loading
    } else {
        match raw_id.map(ProductId::parse) {
            None | Some(Err(ProductIdError::Empty)) => {
                load_payment_state(state.backend(), None).await
            }
            Some(Ok(id)) => load_payment_state(state.backend(), Some(id)).await,
            // Longer than any id the backend issues
            Some(Err(e @ ProductIdError::TooLong { .. })) => {
                tracing::debug!(error = %e, "Rejected product id");
                ViewState::Error(NOT_FOUND_MESSAGE.to_string())
            }
        }
    };

    match PaymentView::derive(view_state, &settings) {
        PaymentView::Loading => PaymentLoadingTemplate {
            store_name,
            refresh_secs: LOADING_REFRESH_SECS,
        }
        .into_response(),
        PaymentView::Error { message } => {
            tracing::info!(%message, "Payment page unavailable");
            PaymentErrorTemplate {
                store_name,
                message,
            }
            .into_response()
        }
        PaymentView::Ready {
            product,
            whatsapp_link,
        } => PaymentReadyTemplate {
            store_name,
            barcode_image_url: product.barcode_image().unwrap_or_default().to_string(),
            price: format!("${}", product.price),
            title: product.title,
            whatsapp_link,
        }
        .into_response(),
    }
}
