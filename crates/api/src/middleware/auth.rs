//! Session guard and login-state helpers.
//!
//! Login state lives in the session under [`session_keys::SESSION_USER`] as a
//! [`SessionUser`]. A request is authenticated iff that record exists and has
//! `logged_in` set.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::error::{AppError, LOGIN_REQUIRED};
use crate::models::{SessionUser, session_keys};

/// Extractor that requires a logged-in session.
///
/// Rejects with 401 `{"message": "Please log in to continue."}` before the
/// handler runs.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireLogin(login): RequireLogin) -> String {
///     format!("Hello, user {}!", login.user_id)
/// }
/// ```
pub struct RequireLogin(pub SessionUser);

impl<S> FromRequestParts<S> for RequireLogin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        match current_login(session).await? {
            Some(login) => Ok(Self(login)),
            None => Err(AppError::Unauthorized(LOGIN_REQUIRED.to_string())),
        }
    }
}

/// The session's login record, if the user is logged in.
///
/// # Errors
///
/// Returns an error if the session cannot be loaded.
pub async fn current_login(
    session: &Session,
) -> Result<Option<SessionUser>, tower_sessions::session::Error> {
    let login = session
        .get::<SessionUser>(session_keys::SESSION_USER)
        .await?;
    Ok(login.filter(|l| l.logged_in))
}

/// Record a successful login.
///
/// The session ID is rotated first, and the session is saved before
/// returning so the cookie handed back always refers to a stored record.
///
/// # Errors
///
/// Returns an error if the session cannot be modified or saved.
pub async fn start_session(
    session: &Session,
    login: &SessionUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::SESSION_USER, login).await?;
    session.save().await
}

/// Destroy the session if it is logged in.
///
/// Returns `false` when there was no login to end.
///
/// # Errors
///
/// Returns an error if the session cannot be loaded or deleted.
pub async fn end_session(session: &Session) -> Result<bool, tower_sessions::session::Error> {
    if current_login(session).await?.is_none() {
        return Ok(false);
    }

    session.flush().await?;
    Ok(true)
}
