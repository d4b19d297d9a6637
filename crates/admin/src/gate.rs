//! Admin panel gate: the login view or the dashboard, never both.
//!
//! The authenticated flag lives in the admin's session as a
//! [`CurrentAdmin`] record. A new session starts logged out, login success
//! sets the record, logout clears the whole session.
//!
//! ```text
//!             on_login_success
//!   LoggedOut ----------------> LoggedIn
//!       ^                          |
//!       +--------------------------+
//!                on_logout
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::models::{CurrentAdmin, session_keys};

/// Which view the panel renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateView<'a> {
    /// Login form posting to `/auth/login`.
    Login,
    /// Dashboard with a logout form posting to `/auth/logout`.
    Dashboard(&'a CurrentAdmin),
}

/// Two-state switch between the login view and the dashboard, bound to one
/// admin session.
pub struct AuthGate {
    session: Session,
    admin: Option<CurrentAdmin>,
}

impl AuthGate {
    /// Restore the gate from a session.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Session` if the session store cannot be read.
    pub async fn load(session: Session) -> Result<Self, AppError> {
        let admin = session
            .get::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
            .await?;
        Ok(Self { session, admin })
    }

    /// Whether the dashboard is shown.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.admin.is_some()
    }

    /// The view to render for the current state.
    #[must_use]
    pub fn view(&self) -> GateView<'_> {
        self.admin.as_ref().map_or(GateView::Login, GateView::Dashboard)
    }

    /// Switch to the dashboard after the login form accepted the credentials.
    ///
    /// The session id is cycled before the identity is stored.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Session` if the session cannot be modified.
    pub async fn on_login_success(&mut self, username: &str) -> Result<(), AppError> {
        self.session.cycle_id().await?;

        let admin = CurrentAdmin::signed_in_now(username);
        self.session
            .insert(session_keys::CURRENT_ADMIN, &admin)
            .await?;

        set_sentry_user(&admin.username);
        tracing::info!(username = %admin.username, "Admin logged in");
        self.admin = Some(admin);
        Ok(())
    }

    /// Switch back to the login view.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Session` if the session cannot be cleared.
    pub async fn on_logout(&mut self) -> Result<(), AppError> {
        self.session.flush().await?;

        if let Some(admin) = self.admin.take() {
            tracing::info!(username = %admin.username, "Admin logged out");
        }
        clear_sentry_user();
        Ok(())
    }
}

impl<S> FromRequestParts<S> for AuthGate
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        Self::load(session).await
    }
}
