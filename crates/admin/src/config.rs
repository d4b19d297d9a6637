//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ADMIN_BASE_URL` - Public URL for the admin panel (`https://` enables secure cookies)
//! - `ADMIN_USERNAME` - Login name of the single admin account
//! - `ADMIN_PASSWORD_HASH` - Argon2 PHC string for the admin password
//!
//! ## Optional
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};

use argon2::password_hash::PasswordHash;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the admin panel
    pub base_url: Url,
    /// Admin login credentials
    pub credentials: AdminCredentials,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
}

/// The admin account checked by the login form.
///
/// Implements `Debug` manually to redact the password hash.
#[derive(Clone)]
pub struct AdminCredentials {
    /// Login name
    pub username: String,
    /// Argon2 PHC string
    pub password_hash: SecretString,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid, or
    /// if the password hash is not an Argon2 PHC string.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("ADMIN_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("ADMIN_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_PORT".to_string(), e.to_string()))?;
        let base_url = parse_base_url(&get_required_env("ADMIN_BASE_URL")?)?;

        let username = get_required_env("ADMIN_USERNAME")?.trim().to_string();
        if username.is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "ADMIN_USERNAME".to_string(),
                "must not be blank".to_string(),
            ));
        }
        let password_hash = SecretString::from(get_required_env("ADMIN_PASSWORD_HASH")?);
        validate_password_hash(&password_hash, "ADMIN_PASSWORD_HASH")?;

        Ok(Self {
            host,
            port,
            base_url,
            credentials: AdminCredentials {
                username,
                password_hash,
            },
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether session cookies must be marked `Secure`.
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.base_url.scheme() == "https"
    }
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable, treating blank values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.trim().is_empty())
}

/// Get an environment variable or a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse the public base URL; only http(s) makes sense for a cookie origin.
fn parse_base_url(value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_BASE_URL".to_string(), e.to_string()))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidEnvVar(
            "ADMIN_BASE_URL".to_string(),
            format!("unsupported scheme '{other}'"),
        )),
    }
}

/// Require a well-formed Argon2 PHC string.
///
/// A plain-text password in this variable is rejected rather than hashed.
fn validate_password_hash(hash: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let parsed = PasswordHash::new(hash.expose_secret()).map_err(|_| {
        ConfigError::InsecureSecret(
            var_name.to_string(),
            "not a PHC string; store an Argon2 hash, never the password itself".to_string(),
        )
    })?;

    if !parsed.algorithm.as_str().starts_with("argon2") {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("unsupported algorithm '{}', expected argon2", parsed.algorithm),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$2jgKpKqnQ7dsUlNc5OcRUA2Bu0M3jGtJAlSNkyjCnvQ";

    fn config(base_url: &str) -> AdminConfig {
        AdminConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3001,
            base_url: Url::parse(base_url).unwrap(),
            credentials: AdminCredentials {
                username: "admin".to_string(),
                password_hash: SecretString::from(HASH),
            },
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    #[test]
    fn test_validate_password_hash_accepts_argon2() {
        assert!(validate_password_hash(&SecretString::from(HASH), "TEST_VAR").is_ok());
    }

    #[test]
    fn test_validate_password_hash_rejects_plain_text() {
        let err = validate_password_hash(&SecretString::from("hunter2"), "TEST_VAR").unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_validate_password_hash_rejects_other_algorithms() {
        let pbkdf2 = "$pbkdf2-sha256$i=10000$c29tZXNhbHQ$ZGVyaXZlZGtleQ";
        let err = validate_password_hash(&SecretString::from(pbkdf2), "TEST_VAR").unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_parse_base_url() {
        assert!(parse_base_url("https://admin.example.com").is_ok());
        assert!(parse_base_url("ftp://admin.example.com").is_err());
        assert!(parse_base_url("not a url").is_err());
    }

    #[test]
    fn test_secure_cookies_follow_scheme() {
        assert!(config("https://admin.example.com").secure_cookies());
        assert!(!config("http://localhost:3001").secure_cookies());
    }

    #[test]
    fn test_socket_addr() {
        let config = config("http://localhost:3001");
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3001");
    }

    #[test]
    fn test_debug_redacts_hash() {
        let debug = format!("{:?}", config("http://localhost:3001"));
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("argon2id"));
    }
}
