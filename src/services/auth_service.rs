//! Domain service for authentication and account recovery.
//!
//! Handles sign-up, sign-in, bearer tokens, password resets and the
//! hosted-identity account upsert.

use serde::Serialize;
use thiserror::Error;

use crate::models::user::{HostedProfile, User};

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("User with this email already exists")]
    EmailTaken,

    #[error("Invalid or expired reset token")]
    InvalidResetToken,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(format!("{err:#}"))
    }
}

#[derive(Debug, Clone)]
pub struct SignUp {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Result of a successful local sign-up or sign-in.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates a local account and signs it in.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::EmailTaken`] if the email is already registered.
    async fn sign_up(&self, request: SignUp) -> Result<AuthSession, AuthError>;

    /// Verifies credentials and issues a bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for an unknown email or wrong password.
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError>;

    /// Returns the user id for a valid bearer token.
    fn verify_token(&self, token: &str) -> Option<String>;

    async fn get_user(&self, id: &str) -> Result<Option<User>, AuthError>;

    /// Stores and emails a reset token when the email is registered.
    /// Unknown emails and delivery failures are not reported to the caller.
    async fn forgot_password(&self, email: &str) -> Result<(), AuthError>;

    /// Sets a new password using a reset token. Each token works once.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidResetToken`] for unknown, expired or used tokens.
    async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AuthError>;

    /// Creates or refreshes the account behind a hosted-identity login.
    async fn complete_hosted_login(&self, profile: HostedProfile) -> Result<User, AuthError>;
}

/// Lowercased, trimmed email used for storage and lookup.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "Invalid email or password"
        );
        assert_eq!(
            AuthError::EmailTaken.to_string(),
            "User with this email already exists"
        );
        assert_eq!(
            AuthError::InvalidResetToken.to_string(),
            "Invalid or expired reset token"
        );
    }
}
