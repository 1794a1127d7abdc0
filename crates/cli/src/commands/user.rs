//! User management commands.
//!
//! Users are created through [`AccountService`], so the command applies the
//! same validation and hashing as `POST /api/users`.

use accounts_api::db::PgStore;
use accounts_api::models::NewUser;
use accounts_api::services::{AccountService, PasswordPolicy};

use super::{CliError, connect};

/// Fields for a new user.
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

/// Create a new user, returning its ID.
pub async fn create(input: CreateUser, min_password_length: usize) -> Result<i32, CliError> {
    if min_password_length == 0 {
        return Err(CliError::InvalidArgument(
            "--min-password-length must be at least 1".to_owned(),
        ));
    }

    let store = PgStore::new(connect().await?);
    let policy = PasswordPolicy {
        min_length: min_password_length,
    };

    tracing::info!("Creating user: {} <{}>", input.username, input.email);

    let user = AccountService::new(&store, policy)
        .create(NewUser {
            username: Some(input.username),
            first_name: Some(input.first_name),
            last_name: Some(input.last_name),
            email: Some(input.email),
            password: Some(input.password),
            ..NewUser::default()
        })
        .await?;

    tracing::info!(
        "User created successfully! ID: {}, Username: {}, Email: {}",
        user.id,
        user.username,
        user.email
    );

    Ok(user.id.as_i32())
}
