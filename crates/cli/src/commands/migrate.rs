//! Database migration command.
//!
//! Migrations are embedded from `crates/api/migrations/`.

use accounts_api::db;

use super::{CliError, connect};

/// Run all pending migrations.
pub async fn run() -> Result<(), CliError> {
    let pool = connect().await?;

    tracing::info!("Running accounts migrations...");
    db::run_migrations(&pool).await?;

    tracing::info!("Accounts migrations complete!");
    Ok(())
}
