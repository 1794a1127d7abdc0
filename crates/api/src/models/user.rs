//! User and cart domain types.
//!
//! These types represent validated domain objects separate from database row
//! types. None of them carry the password hash, so they are safe to serialize
//! into responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use accounts_core::{Balance, CartId, Email, UserId};

/// A user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login-independent handle. Cannot be changed after creation.
    pub username: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact and login email, unique across users.
    pub email: Email,
    /// Store credit.
    pub balance: Balance,
    /// Cart the user is currently shopping with, if any.
    pub cart_id: Option<CartId>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A shopping cart owned by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cart {
    /// Unique cart ID.
    pub id: CartId,
    /// Owner of the cart.
    pub user_id: UserId,
    /// When the cart was opened.
    pub created_at: DateTime<Utc>,
}

/// A user together with the carts they own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserWithCarts {
    #[serde(flatten)]
    pub user: User,
    pub carts: Vec<Cart>,
}

/// Unvalidated input for creating a user.
///
/// Every field is optional at this stage so that missing values surface as
/// validation errors instead of body-parsing rejections.
#[derive(Default, Clone, Deserialize)]
pub struct NewUser {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub cart_id: Option<CartId>,
    pub balance: Option<Balance>,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("cart_id", &self.cart_id)
            .field("balance", &self.balance)
            .finish()
    }
}

/// Unvalidated partial update of the current user.
///
/// `None` leaves the column untouched. The username is deliberately absent.
#[derive(Default, Clone, Deserialize)]
pub struct UserChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl std::fmt::Debug for UserChanges {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserChanges")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// A validated user ready to be inserted, password already hashed.
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub password_hash: String,
    pub cart_id: Option<CartId>,
    pub balance: Balance,
}

/// A validated partial update, password already hashed.
#[derive(Debug, Clone, Default)]
pub struct UserChangesRecord {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<Email>,
    pub password_hash: Option<String>,
}
