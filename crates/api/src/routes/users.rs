//! User account route handlers.
//!
//! JSON in, JSON out. Error bodies are `{"message": "..."}`, see
//! [`crate::error::AppError`].

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use accounts_core::UserId;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{RequireLogin, end_session, start_session};
use crate::models::{NewUser, SessionUser, User, UserChanges, UserWithCarts};
use crate::services::AccountError;
use crate::state::AppState;
use crate::validation::{ValidationError, ValidationErrors, ValidationRule};

// =============================================================================
// Request / Response Types
// =============================================================================

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Body returned by create and update.
#[derive(Debug, Serialize)]
pub struct UserMessage {
    pub message: &'static str,
    pub user: User,
}

/// Body returned by login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: User,
    pub message: &'static str,
}

/// Body returned by delete.
#[derive(Debug, Serialize)]
pub struct Deleted {
    pub deleted: u64,
}

/// Parse a path segment as a user ID. Anything unparsable is an unknown user.
fn user_id(raw: &str) -> std::result::Result<UserId, AccountError> {
    raw.parse().map_err(|_| AccountError::NotFound)
}

/// An unreadable user body is reported like any other unusable input.
fn user_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected user body");
        AccountError::Validation(ValidationErrors::single(ValidationError::new(
            "body",
            ValidationRule::NotEmpty,
        )))
        .into()
    })
}

// =============================================================================
// Handlers
// =============================================================================

/// List every user with their carts.
///
/// GET /api/users
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<UserWithCarts>>> {
    Ok(Json(state.accounts().list().await?))
}

/// Fetch one user with their carts.
///
/// GET /api/users/{id}
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserWithCarts>> {
    let id = user_id(&id)?;
    Ok(Json(state.accounts().get(id).await?))
}

/// Create a user.
///
/// POST /api/users
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<NewUser>, JsonRejection>,
) -> Result<Json<UserMessage>> {
    let input = user_body(payload)?;
    let user = state.accounts().create(input).await?;

    Ok(Json(UserMessage {
        message: "Success",
        user,
    }))
}

/// Delete a user and their carts.
///
/// DELETE /api/users/{id}
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Deleted>> {
    let id = user_id(&id)?;
    let deleted = state.accounts().delete(id).await?;
    Ok(Json(Deleted { deleted }))
}

/// Log in with email and password.
///
/// POST /api/users/login
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>> {
    let Json(req) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    let logged_in = state
        .auth()
        .login_with_password(&req.email, &req.password)
        .await?;

    start_session(
        &session,
        &SessionUser::logged_in(logged_in.user.id, logged_in.cart_count),
    )
    .await?;

    set_sentry_user(&logged_in.user.id, Some(logged_in.user.email.as_str()));
    tracing::info!(
        user_id = %logged_in.user.id,
        cart_count = logged_in.cart_count,
        "User logged in"
    );

    Ok(Json(LoginResponse {
        user: logged_in.user,
        message: "You are now logged in!",
    }))
}

/// End the current session.
///
/// POST /api/users/logout
///
/// 204 when a logged-in session was destroyed, 404 otherwise. Both bodies
/// are empty.
pub async fn logout(session: Session) -> Result<StatusCode> {
    if end_session(&session).await? {
        clear_sentry_user();
        tracing::info!("User logged out");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Ok(StatusCode::NOT_FOUND)
    }
}

/// Update the logged-in user.
///
/// PUT /api/users
pub async fn update(
    RequireLogin(login): RequireLogin,
    State(state): State<AppState>,
    payload: std::result::Result<Json<UserChanges>, JsonRejection>,
) -> Result<Json<UserMessage>> {
    let changes = user_body(payload)?;
    let user = state.accounts().update(login.user_id, changes).await?;

    Ok(Json(UserMessage {
        message: "User updated!",
        user,
    }))
}
