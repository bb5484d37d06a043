//! Authentication error types.

use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur during authentication and account operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] ecoquest_core::EmailError),

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// A user with this email is already registered.
    #[error("user already exists")]
    UserAlreadyExists,

    /// The email belongs to another user.
    #[error("email is already in use")]
    EmailTaken,

    /// A required field is missing or unusable.
    #[error("{0}")]
    InvalidInput(String),

    /// No user is logged in.
    #[error("not logged in")]
    NotAuthenticated,

    /// No registered user has this ID.
    #[error("user {0} not found")]
    UserNotFound(ecoquest_core::UserId),

    /// The balance does not cover the charge.
    #[error("insufficient balance")]
    InsufficientBalance,

    /// Store read/write error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
