//! Authentication service.
//!
//! Email and password login. Session bookkeeping is left to the caller, see
//! [`crate::middleware::auth`].

mod error;

pub use error::AuthError;

use accounts_core::Email;

use crate::db::UserStore;
use crate::models::User;
use crate::services::password::verify_password_blocking;

/// A successful login.
#[derive(Debug, Clone)]
pub struct LoggedIn {
    /// The authenticated user.
    pub user: User,
    /// Number of carts the user owns.
    pub cart_count: usize,
}

/// Authentication service.
pub struct AuthService<'a> {
    store: &'a dyn UserStore,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(store: &'a dyn UserStore) -> Self {
        Self { store }
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::EmailNotRegistered` if no user has this email and
    /// `AuthError::InvalidCredentials` if the password is wrong.
    pub async fn login_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<LoggedIn, AuthError> {
        let email = Email::parse(email.trim()).map_err(|_| AuthError::EmailNotRegistered)?;

        let (user, password_hash) = self
            .store
            .get_credentials(&email)
            .await?
            .ok_or(AuthError::EmailNotRegistered)?;

        if !verify_password_blocking(password.to_owned(), password_hash).await? {
            tracing::debug!(user_id = %user.id, "Password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let cart_count = self.store.list_carts(user.id).await?.len();

        Ok(LoggedIn { user, cart_count })
    }
}
