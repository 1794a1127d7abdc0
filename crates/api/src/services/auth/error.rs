//! Authentication error types.

use thiserror::Error;

use crate::db::StoreError;
use crate::services::password::PasswordError;

/// Errors that can occur during login.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No user holds this email, or the email is malformed.
    #[error("email is not registered")]
    EmailNotRegistered,

    /// Password does not match the stored hash.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Stored hash could not be verified.
    #[error("password verification error: {0}")]
    Password(#[from] PasswordError),
}
