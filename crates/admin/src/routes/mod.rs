//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /               - Login form or dashboard, depending on the session
//! GET  /health         - Liveness check
//!
//! # Authentication
//! POST /auth/login     - Check credentials, sign in
//! POST /auth/logout    - Sign out
//! ```

pub mod auth;
pub mod panel;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create all routes for the admin panel.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(panel::index))
        .route("/health", get(health))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
