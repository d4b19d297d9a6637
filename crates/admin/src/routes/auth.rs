//! Login and logout handlers.

use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use super::panel::LoginTemplate;
use crate::error::{AppError, Result};
use crate::gate::AuthGate;
use crate::services::auth::{AuthError, verify_credentials};
use crate::state::AppState;

/// Login form fields.
#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Check credentials and open the dashboard.
///
/// POST /auth/login
#[instrument(skip(state, gate, form), fields(username = %form.username))]
pub async fn login(
    State(state): State<AppState>,
    mut gate: AuthGate,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let credentials = state.credentials().clone();
    let LoginForm { username, password } = form;

    // Argon2 is deliberately slow; keep it off the async workers
    let checked_username = username.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        verify_credentials(&credentials, &checked_username, &password)
    })
    .await
    .map_err(|e| AppError::Internal(format!("credential check panicked: {e}")))?;

    match outcome {
        Ok(()) => {
            gate.on_login_success(username.trim()).await?;
            Ok(Redirect::to("/").into_response())
        }
        Err(AuthError::InvalidCredentials) => {
            tracing::warn!("Admin login rejected");
            let page = LoginTemplate {
                error: Some(AuthError::InvalidCredentials.to_string()),
                username,
            };
            Ok((StatusCode::UNAUTHORIZED, page).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Sign out and return to the login view.
///
/// POST /auth/logout
pub async fn logout(mut gate: AuthGate) -> Result<Redirect> {
    gate.on_logout().await?;
    Ok(Redirect::to("/"))
}
