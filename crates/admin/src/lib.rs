//! Keystand admin library.
//!
//! The admin panel's gate between the login form and the dashboard,
//! exposed as a library so the router can be exercised in tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod gate;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::Router;
use tower_http::trace::TraceLayer;

use config::AdminConfig;
use state::AppState;

/// Build the admin router with its session and tracing layers.
pub fn app(config: AdminConfig) -> Router {
    let session_layer = middleware::create_session_layer(&config);

    Router::new()
        .merge(routes::routes())
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(config.credentials))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header, request};
    use axum::response::Response;
    use tower::ServiceExt;
    use url::Url;

    use super::*;
    use crate::config::AdminConfig;
    use crate::middleware::SESSION_COOKIE_NAME;
    use crate::services::auth::tests::credentials;

    const PASSWORD: &str = "correct horse battery staple";

    fn test_app() -> Router {
        app(AdminConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3001,
            base_url: Url::parse("http://localhost:3001").unwrap(),
            credentials: credentials(),
            sentry_dsn: None,
            sentry_environment: None,
        })
    }

    fn with_cookie(builder: request::Builder, cookie: Option<&str>) -> request::Builder {
        match cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }

    async fn get_root(app: &Router, cookie: Option<&str>) -> (StatusCode, String) {
        let request = with_cookie(Request::builder().uri("/"), cookie)
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    async fn post(app: &Router, uri: &str, form: &str, cookie: Option<&str>) -> Response {
        let request = with_cookie(Request::builder().method("POST").uri(uri), cookie)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap();
        app.clone().oneshot(request).await.unwrap()
    }

    /// `name=value` of the session cookie set by a response, if any.
    fn session_cookie(response: &Response) -> Option<String> {
        response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| v.split(';').next())
            .find(|pair| pair.starts_with(SESSION_COOKIE_NAME))
            .map(String::from)
    }

    async fn login(app: &Router) -> String {
        let form = format!("username=admin&password={}", PASSWORD.replace(' ', "+"));
        let response = post(app, "/auth/login", &form, None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        session_cookie(&response).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = test_app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn test_fresh_visit_shows_login() {
        let app = test_app();
        let (status, body) = get_root(&app, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Admin Sign In"));
        assert!(body.contains("action=\"/auth/login\""));
        assert!(!body.contains("Dashboard"));
    }

    #[tokio::test]
    async fn test_failed_login_rerenders_form() {
        let app = test_app();
        let response = post(&app, "/auth/login", "username=admin&password=nope", None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(session_cookie(&response).is_none());

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("Invalid username or password."));
        assert!(body.contains("value=\"admin\""));

        let (_, body) = get_root(&app, None).await;
        assert!(body.contains("Admin Sign In"));
    }

    #[tokio::test]
    async fn test_login_sets_hardened_cookie() {
        let app = test_app();
        let form = format!("username=admin&password={}", PASSWORD.replace(' ', "+"));
        let response = post(&app, "/auth/login", &form, None).await;

        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(set_cookie.starts_with(SESSION_COOKIE_NAME));
        assert!(set_cookie.contains("HttpOnly"));
        assert!(set_cookie.contains("SameSite=Strict"));
    }

    #[tokio::test]
    async fn test_login_logout_cycle() {
        let app = test_app();

        for _ in 0..3 {
            let cookie = login(&app).await;

            let (status, body) = get_root(&app, Some(&cookie)).await;
            assert_eq!(status, StatusCode::OK);
            assert!(body.contains("Dashboard"));
            assert!(body.contains("Signed in as <strong>admin</strong>"));
            assert!(body.contains("action=\"/auth/logout\""));

            let response = post(&app, "/auth/logout", "", Some(&cookie)).await;
            assert_eq!(response.status(), StatusCode::SEE_OTHER);

            // The old cookie no longer opens the dashboard
            let (_, body) = get_root(&app, Some(&cookie)).await;
            assert!(body.contains("Admin Sign In"));
        }
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let app = test_app();
        let cookie = login(&app).await;

        let (_, body) = get_root(&app, None).await;
        assert!(body.contains("Admin Sign In"));

        let (_, body) = get_root(&app, Some(&cookie)).await;
        assert!(body.contains("Dashboard"));
    }
}
