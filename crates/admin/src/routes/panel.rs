//! Admin panel page.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::{IntoResponse, Response};

use crate::gate::{AuthGate, GateView};
use crate::models::CurrentAdmin;

/// Login form.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    /// Shown above the form after a failed attempt.
    pub error: Option<String>,
    /// Echoed back into the username field.
    pub username: String,
}

impl LoginTemplate {
    /// An empty login form.
    #[must_use]
    pub const fn blank() -> Self {
        Self {
            error: None,
            username: String::new(),
        }
    }
}

/// Dashboard shown to a signed-in admin.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub username: String,
    pub logged_in_at: String,
}

impl From<&CurrentAdmin> for DashboardTemplate {
    fn from(admin: &CurrentAdmin) -> Self {
        Self {
            username: admin.username.clone(),
            logged_in_at: admin.logged_in_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        }
    }
}

/// Render whichever view the gate selects.
///
/// GET /
pub async fn index(gate: AuthGate) -> Response {
    match gate.view() {
        GateView::Dashboard(admin) => DashboardTemplate::from(admin).into_response(),
        GateView::Login => LoginTemplate::blank().into_response(),
    }
}
