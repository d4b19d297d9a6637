//! Admin credential checks.
//!
//! A single admin account is configured through the environment. The
//! password is stored only as an Argon2 hash.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordVerifier},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::AdminCredentials;

/// Errors that can occur while checking a login attempt.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Username or password did not match.
    #[error("Invalid username or password.")]
    InvalidCredentials,

    /// The configured hash could not be parsed.
    #[error("stored password hash is malformed")]
    MalformedHash,
}

/// Check a username/password pair against the configured admin account.
///
/// The password is always verified, even for an unknown username, so both
/// failure cases cost the same.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` if either value is wrong, or
/// `AuthError::MalformedHash` if the configured hash cannot be parsed.
pub fn verify_credentials(
    credentials: &AdminCredentials,
    username: &str,
    password: &str,
) -> Result<(), AuthError> {
    let password_ok = verify_password(password, credentials.password_hash.expose_secret())?;
    let username_ok = username.trim() == credentials.username;

    if password_ok && username_ok {
        Ok(())
    } else {
        Err(AuthError::InvalidCredentials)
    }
}

/// Verify a password against a PHC hash.
fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::MalformedHash)?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
