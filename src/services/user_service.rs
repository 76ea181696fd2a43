//! Domain service for user accounts and their session tokens.
//!
//! Handles registration, login, token authentication and logout.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::User;
use crate::services::credentials::CredentialError;

/// Errors specific to account operations.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Same message for an unknown email and a wrong password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for UserError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for UserError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

impl From<CredentialError> for UserError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::InvalidToken => Self::InvalidToken,
            other => Self::Internal(other.to_string()),
        }
    }
}

/// An authenticated user together with the raw token that was just issued.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub token: String,
}

#[async_trait]
pub trait UserService: Send + Sync {
    /// Creates an account and opens its first session.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::Validation`] for a malformed email or short
    /// password and [`UserError::Conflict`] if the email is taken.
    async fn register(&self, email: &str, password: &str) -> Result<Session, UserError>;

    /// Verifies credentials and opens an additional session.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::InvalidCredentials`] for any failed check.
    async fn login(&self, email: &str, password: &str) -> Result<Session, UserError>;

    /// Resolves a token to its user. Fails with [`UserError::InvalidToken`]
    /// if the signature is bad or the token has been revoked.
    async fn authenticate(&self, token: &str) -> Result<User, UserError>;

    /// Revokes one token. Revoking a token that is not listed is not an error.
    async fn logout(&self, user: &User, token: &str) -> Result<(), UserError>;

    async fn count(&self) -> Result<u64, UserError>;
}
