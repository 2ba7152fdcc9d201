//! Business logic services.
//!
//! # Services
//!
//! - `auth` - signup, login and password change
//! - `ratings` - rating submission and aggregation
//! - `admin` - user and store management for administrators
//! - `directory` - read-only views: lists, details and dashboards
//!
//! Services validate input with the rules in `store_ratings_core::validation`
//! and perform each mutation inside one Data Store write transaction.

pub mod admin;
pub mod auth;
pub mod directory;
pub mod ratings;

use thiserror::Error;

use store_ratings_core::ValidationError;

use crate::db::RepositoryError;

/// Errors returned by the non-auth services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A submitted field failed its validation rule.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The named record does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A uniqueness constraint would be violated.
    #[error("{0}")]
    Duplicate(String),

    /// The operation is not allowed on this record.
    #[error("{0}")]
    Forbidden(&'static str),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// The Data Store could not complete the write.
    #[error("storage error: {0}")]
    Storage(RepositoryError),
}

impl ServiceError {
    /// Map a repository error, naming the record for `NotFound`.
    #[must_use]
    pub fn from_repository(err: RepositoryError, record: &'static str) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound(record),
            RepositoryError::Conflict(message) => Self::Duplicate(message),
            other @ RepositoryError::IdsExhausted => Self::Storage(other),
        }
    }
}
