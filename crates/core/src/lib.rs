//! Accounts Core - Shared types library.
//!
//! Common types used across the accounts workspace:
//! - `api` - The account management HTTP service
//! - `cli` - Command-line tools for migrations and user management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. With the `postgres` feature the types also implement
//! the sqlx encode/decode traits.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, emails and account balances

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
