//! `PostgreSQL` implementation of [`UserStore`].
//!
//! Queries are checked at runtime (`query_as::<_, Row>`) so the crate builds
//! without a live database.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use accounts_core::{Balance, CartId, Email, UserId};

use super::{StoreError, UserStore};
use crate::models::{Cart, NewUserRecord, User, UserChangesRecord, UserWithCarts};

const USER_COLUMNS: &str =
    "id, username, first_name, last_name, email, balance, cart_id, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: UserId,
    username: String,
    first_name: String,
    last_name: String,
    email: Email,
    balance: Balance,
    cart_id: Option<CartId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            balance: row.balance,
            cart_id: row.cart_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CredentialRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

#[derive(Debug, sqlx::FromRow)]
struct CartRow {
    id: CartId,
    user_id: UserId,
    created_at: DateTime<Utc>,
}

impl From<CartRow> for Cart {
    fn from(row: CartRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            created_at: row.created_at,
        }
    }
}

/// Map constraint violations on `accounts.users` writes to store errors.
fn map_write_error(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.is_unique_violation() {
            let field = match db_err.constraint() {
                Some("users_username_key") => "username",
                _ => "email",
            };
            return StoreError::Conflict { field };
        }
        if db_err.is_foreign_key_violation() {
            return StoreError::MissingReference { field: "cart_id" };
        }
    }
    StoreError::Database(e)
}

/// User store backed by the `accounts` schema.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn list_users(&self) -> Result<Vec<UserWithCarts>, StoreError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM accounts.users ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        let cart_rows = sqlx::query_as::<_, CartRow>(
            r"
            SELECT id, user_id, created_at
            FROM accounts.carts
            ORDER BY id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut carts_by_user: HashMap<UserId, Vec<Cart>> = HashMap::new();
        for row in cart_rows {
            carts_by_user.entry(row.user_id).or_default().push(row.into());
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let carts = carts_by_user.remove(&row.id).unwrap_or_default();
                UserWithCarts {
                    user: row.into(),
                    carts,
                }
            })
            .collect())
    }

    async fn get_user(&self, id: UserId) -> Result<Option<UserWithCarts>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM accounts.users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let user = User::from(row);
        let carts = self.list_carts(user.id).await?;

        Ok(Some(UserWithCarts { user, carts }))
    }

    async fn get_credentials(&self, email: &Email) -> Result<Option<(User, String)>, StoreError> {
        let row = sqlx::query_as::<_, CredentialRow>(&format!(
            "SELECT {USER_COLUMNS}, password_hash FROM accounts.users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        let Some(r) = row else {
            return Ok(None);
        };

        Ok(Some((r.user.into(), r.password_hash)))
    }

    async fn insert_user(&self, record: NewUserRecord) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r"
            INSERT INTO accounts.users
                (username, first_name, last_name, email, password_hash, balance, cart_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {USER_COLUMNS}
            "
        ))
        .bind(&record.username)
        .bind(&record.first_name)
        .bind(&record.last_name)
        .bind(&record.email)
        .bind(&record.password_hash)
        .bind(record.balance)
        .bind(record.cart_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(row.into())
    }

    async fn update_user(
        &self,
        id: UserId,
        changes: UserChangesRecord,
    ) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r"
            UPDATE accounts.users
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                password_hash = COALESCE($5, password_hash),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "
        ))
        .bind(id)
        .bind(changes.first_name)
        .bind(changes.last_name)
        .bind(changes.email)
        .bind(changes.password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(row.map(User::from))
    }

    async fn delete_user(&self, id: UserId) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM accounts.users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn list_carts(&self, user_id: UserId) -> Result<Vec<Cart>, StoreError> {
        let rows = sqlx::query_as::<_, CartRow>(
            r"
            SELECT id, user_id, created_at
            FROM accounts.carts
            WHERE user_id = $1
            ORDER BY id ASC
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Cart::from).collect())
    }

    async fn create_cart(&self, user_id: UserId) -> Result<Cart, StoreError> {
        let row = sqlx::query_as::<_, CartRow>(
            r"
            INSERT INTO accounts.carts (user_id)
            VALUES ($1)
            RETURNING id, user_id, created_at
            ",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match map_write_error(e) {
            StoreError::MissingReference { .. } => StoreError::MissingReference { field: "user_id" },
            other => other,
        })?;

        Ok(row.into())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
