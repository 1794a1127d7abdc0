//! Domain models for the accounts service.

pub mod session;
pub mod user;

pub use session::{SessionUser, keys as session_keys};
pub use user::{
    Cart, NewUser, NewUserRecord, User, UserChanges, UserChangesRecord, UserWithCarts,
};
