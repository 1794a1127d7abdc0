//! Unified error handling with Sentry integration.
//!
//! Handlers return `Result<T, AppError>`. Every non-empty error body is
//! `{"message": "..."}`. Server errors are captured to Sentry and answered
//! with a generic message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::services::accounts::AccountError;
use crate::services::auth::AuthError;

/// Message for unknown or malformed user IDs.
pub const USER_NOT_FOUND: &str = "This user ID does not exist. Please enter a valid user ID!";

/// Message sent when the session guard rejects a request.
pub const LOGIN_REQUIRED: &str = "Please log in to continue.";

pub const INTERNAL_MESSAGE: &str = "Internal server error";

/// Application-level error type for the accounts API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Account operation failed.
    #[error("Account error: {0}")]
    Account(#[from] AccountError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Session could not be read or written.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Session(_)
                | Self::Internal(_)
                | Self::Account(AccountError::Store(_) | AccountError::Password(_))
                | Self::Auth(AuthError::Store(_) | AuthError::Password(_))
        )
    }

    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        if self.is_server_error() {
            return StatusCode::INTERNAL_SERVER_ERROR;
        }

        match self {
            Self::Account(AccountError::NotFound) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Message sent to the client. Never includes internal error details.
    #[must_use]
    pub fn client_message(&self) -> String {
        if self.is_server_error() {
            return INTERNAL_MESSAGE.to_owned();
        }

        match self {
            Self::Account(AccountError::Validation(errors)) => errors.client_message(),
            Self::Account(_) => USER_NOT_FOUND.to_owned(),
            Self::Auth(AuthError::EmailNotRegistered) => "Email is not registered.".to_owned(),
            Self::Auth(_) => "Incorrect email or password, please try again".to_owned(),
            Self::Unauthorized(msg) | Self::BadRequest(msg) => msg.clone(),
            Self::Session(_) | Self::Internal(_) => INTERNAL_MESSAGE.to_owned(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        (
            self.status(),
            Json(json!({ "message": self.client_message() })),
        )
            .into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
