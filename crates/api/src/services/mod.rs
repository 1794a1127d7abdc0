//! Business logic services for the accounts API.
//!
//! # Services
//!
//! - `accounts` - Validate, hash and persist user records
//! - `auth` - Email and password login
//! - `password` - Argon2id hashing and the password policy

pub mod accounts;
pub mod auth;
pub mod password;

pub use accounts::{AccountError, AccountService};
pub use auth::{AuthError, AuthService, LoggedIn};
pub use password::{PasswordError, PasswordPolicy};
