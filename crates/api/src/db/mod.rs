//! Persistence for users and carts.
//!
//! # Database: `accounts`
//!
//! ## Tables
//!
//! - `accounts.users` - User accounts with Argon2id password hashes
//! - `accounts.carts` - Carts owned by users
//! - `tower_sessions.session` - Tower-sessions storage
//!
//! # Backends
//!
//! [`UserStore`] is implemented by [`PgStore`] for production and by
//! [`MemoryStore`] for tests and local development.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p accounts-cli -- migrate
//! ```

pub mod memory;
pub mod postgres;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use accounts_core::{Email, UserId};

use crate::models::{Cart, NewUserRecord, User, UserChangesRecord, UserWithCarts};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Embedded migrations for the accounts database.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A unique column already holds the value being written.
    #[error("{field} must be unique")]
    Conflict {
        /// Column that collided.
        field: &'static str,
    },

    /// A reference column points at a missing row.
    #[error("{field} does not reference an existing record")]
    MissingReference {
        /// Column holding the dangling reference.
        field: &'static str,
    },
}

/// Persistence operations on users and their carts.
///
/// Writes receive already-validated records with hashed passwords.
/// Implementations must enforce uniqueness of `username` and `email`
/// atomically with the write, reporting collisions as
/// [`StoreError::Conflict`].
#[async_trait]
pub trait UserStore: Send + Sync {
    /// All users with their carts, ordered by ID.
    async fn list_users(&self) -> Result<Vec<UserWithCarts>, StoreError>;

    /// A single user with their carts.
    async fn get_user(&self, id: UserId) -> Result<Option<UserWithCarts>, StoreError>;

    /// A user and their password hash, looked up by email.
    async fn get_credentials(&self, email: &Email) -> Result<Option<(User, String)>, StoreError>;

    /// Insert a new user.
    async fn insert_user(&self, record: NewUserRecord) -> Result<User, StoreError>;

    /// Apply a partial update. Returns `None` if the user does not exist.
    async fn update_user(
        &self,
        id: UserId,
        changes: UserChangesRecord,
    ) -> Result<Option<User>, StoreError>;

    /// Delete a user and their carts. Returns the number of users deleted.
    async fn delete_user(&self, id: UserId) -> Result<u64, StoreError>;

    /// Carts owned by a user, oldest first.
    async fn list_carts(&self, user_id: UserId) -> Result<Vec<Cart>, StoreError>;

    /// Open a new cart for a user.
    async fn create_cart(&self, user_id: UserId) -> Result<Cart, StoreError>;

    /// Check that the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Run all pending migrations.
///
/// # Errors
///
/// Returns `MigrateError` if a migration fails or the history is inconsistent.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}
