//! Authentication error types.

use thiserror::Error;

use store_ratings_core::ValidationError;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A submitted field failed its validation rule.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Invalid credentials (wrong password or user not found).
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The session user no longer exists.
    #[error("user not found")]
    UserNotFound,

    /// Email already registered.
    #[error("Email already exists. Please use a different email.")]
    UserAlreadyExists,

    /// Repository error.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
