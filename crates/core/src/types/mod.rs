//! Core types for the accounts service.

pub mod balance;
pub mod email;
pub mod id;

pub use balance::Balance;
pub use email::{Email, EmailError};
pub use id::*;
