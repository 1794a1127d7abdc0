//! CLI subcommands.

pub mod migrate;
pub mod seed;
pub mod user;

use sqlx::PgPool;
use thiserror::Error;

use accounts_api::config::{ConfigError, get_database_url};
use accounts_api::db::{self, StoreError};
use accounts_api::services::AccountError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration is missing or invalid.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// A migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// The store rejected an operation.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Input was rejected. Holds the same message the API would return.
    #[error("{0}")]
    Rejected(String),

    /// Account operation failed for a reason other than bad input.
    #[error("Account error: {0}")]
    Account(AccountError),

    /// A flag value is out of range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<AccountError> for CliError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Validation(errors) => Self::Rejected(errors.client_message()),
            other => Self::Account(other),
        }
    }
}

/// Connect to the accounts database named by the environment.
pub async fn connect() -> Result<PgPool, CliError> {
    dotenvy::dotenv().ok();

    let database_url = get_database_url("ACCOUNTS_DATABASE_URL")?;

    tracing::info!("Connecting to accounts database...");
    Ok(db::create_pool(&database_url).await?)
}
