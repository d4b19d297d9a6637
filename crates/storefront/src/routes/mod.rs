//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (product listing)
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (merchant settings loaded)
//!
//! # Barcode payment
//! GET  /pay/{product_id}       - Payment page for one product
//! GET  /pay, /pay/             - Payment page without a product (error state)
//! ```

pub mod home;
pub mod payment;

use axum::{
    Router,
    extract::State,
    http::{StatusCode, Uri},
    routing::get,
};

use crate::error::AppError;
use crate::state::AppState;

/// Create the barcode payment routes.
pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/pay", get(payment::missing))
        .route("/pay/", get(payment::missing))
        .route("/pay/{product_id}", get(payment::show))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(payment_routes())
        .fallback(not_found)
}

/// Fallback for unknown paths.
async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable until the first settings load finished.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.settings().is_loading() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    }
}


#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::StatusCode;
    use wiremock::MockServer;

    use super::test_support::{get, merchant_settings, state_for};
    use crate::settings::SettingsProvider;

    #[tokio::test]
    async fn test_health() {
        let server = MockServer::start().await;
        let (status, body) = get(state_for(&server, merchant_settings()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn test_readiness_follows_settings() {
        let server = MockServer::start().await;

        let (status, _) = get(state_for(&server, SettingsProvider::new()), "/health/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        let (status, _) = get(state_for(&server, merchant_settings()), "/health/ready").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let server = MockServer::start().await;
        let (status, body) = get(state_for(&server, merchant_settings()), "/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Not found: /nope");
    }
}
