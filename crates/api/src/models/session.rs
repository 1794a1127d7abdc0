//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use accounts_core::UserId;

/// Session-stored login state.
///
/// Recomputed on every login and dropped on logout. Never persisted on the
/// user row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Logged-in user's database ID.
    pub user_id: UserId,
    /// Set on successful login.
    pub logged_in: bool,
    /// Number of carts the user owned at login time.
    pub cart_count: usize,
}

impl SessionUser {
    /// Session state for a user who just logged in.
    #[must_use]
    pub const fn logged_in(user_id: UserId, cart_count: usize) -> Self {
        Self {
            user_id,
            logged_in: true,
            cart_count,
        }
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for the current login state.
    pub const SESSION_USER: &str = "session_user";
}
