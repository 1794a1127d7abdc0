//! User account service.
//!
//! Sits between the handlers and a [`UserStore`]: input is validated, the
//! password is hashed on the blocking pool, and only then is the record
//! written. Store-side constraint violations come back as
//! [`ValidationErrors`] so callers classify every write failure the same way.

use thiserror::Error;

use accounts_core::UserId;

use crate::db::{StoreError, UserStore};
use crate::models::{NewUser, NewUserRecord, User, UserChanges, UserChangesRecord, UserWithCarts};
use crate::services::password::{PasswordError, PasswordPolicy, hash_password_blocking};
use crate::validation::{
    ValidationError, ValidationErrors, ValidationRule, validate_changes, validate_new_user,
};

/// Errors returned by [`AccountService`].
#[derive(Debug, Error)]
pub enum AccountError {
    /// Input broke one or more write rules.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// No user with the requested ID.
    #[error("user not found")]
    NotFound,

    /// Store failure unrelated to the input.
    #[error("store error: {0}")]
    Store(StoreError),

    /// Password hashing failed.
    #[error("password error: {0}")]
    Password(#[from] PasswordError),
}

impl From<StoreError> for AccountError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { field } => Self::Validation(ValidationErrors::single(
                ValidationError::new(field, ValidationRule::NotUnique),
            )),
            StoreError::MissingReference { field } => Self::Validation(ValidationErrors::single(
                ValidationError::new(field, ValidationRule::ForeignKey),
            )),
            other => Self::Store(other),
        }
    }
}

/// CRUD over user accounts.
pub struct AccountService<'a> {
    store: &'a dyn UserStore,
    policy: PasswordPolicy,
}

impl<'a> AccountService<'a> {
    /// Create a service over `store` enforcing `policy` on passwords.
    #[must_use]
    pub const fn new(store: &'a dyn UserStore, policy: PasswordPolicy) -> Self {
        Self { store, policy }
    }

    /// All users with their carts.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Store` if the store fails.
    pub async fn list(&self) -> Result<Vec<UserWithCarts>, AccountError> {
        Ok(self.store.list_users().await?)
    }

    /// A single user with their carts.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::NotFound` if no such user exists.
    pub async fn get(&self, id: UserId) -> Result<UserWithCarts, AccountError> {
        self.store.get_user(id).await?.ok_or(AccountError::NotFound)
    }

    /// Validate, hash and insert a new user.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Validation` if a field rule fails or a unique
    /// value is taken.
    pub async fn create(&self, input: NewUser) -> Result<User, AccountError> {
        let valid = validate_new_user(
            input.username.as_deref(),
            input.first_name.as_deref(),
            input.last_name.as_deref(),
            input.email.as_deref(),
            input.password.as_deref(),
            input.balance,
            self.policy,
        )?;

        let password_hash = hash_password_blocking(valid.password).await?;

        let user = self
            .store
            .insert_user(NewUserRecord {
                username: valid.username,
                first_name: valid.first_name,
                last_name: valid.last_name,
                email: valid.email,
                password_hash,
                cart_id: input.cart_id,
                balance: valid.balance,
            })
            .await?;

        tracing::info!(user_id = %user.id, "User created");
        Ok(user)
    }

    /// Apply a partial update to an existing user.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Validation` on rule violations and
    /// `AccountError::NotFound` if the user no longer exists.
    pub async fn update(&self, id: UserId, changes: UserChanges) -> Result<User, AccountError> {
        let valid = validate_changes(
            changes.first_name.as_deref(),
            changes.last_name.as_deref(),
            changes.email.as_deref(),
            changes.password.as_deref(),
            self.policy,
        )?;

        let password_hash = match valid.password {
            Some(password) => Some(hash_password_blocking(password).await?),
            None => None,
        };

        let user = self
            .store
            .update_user(
                id,
                UserChangesRecord {
                    first_name: valid.first_name,
                    last_name: valid.last_name,
                    email: valid.email,
                    password_hash,
                },
            )
            .await?
            .ok_or(AccountError::NotFound)?;

        tracing::info!(user_id = %user.id, "User updated");
        Ok(user)
    }

    /// Delete a user and their carts, returning the number of rows removed.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::NotFound` if nothing was deleted.
    pub async fn delete(&self, id: UserId) -> Result<u64, AccountError> {
        let deleted = self.store.delete_user(id).await?;
        if deleted == 0 {
            return Err(AccountError::NotFound);
        }

        tracing::info!(user_id = %id, "User deleted");
        Ok(deleted)
    }
}
