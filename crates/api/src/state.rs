//! Application state shared across handlers.

use std::sync::Arc;

use crate::db::UserStore;
use crate::services::accounts::AccountService;
use crate::services::auth::AuthService;
use crate::services::password::PasswordPolicy;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Arc<dyn UserStore>,
    password_policy: PasswordPolicy,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(store: Arc<dyn UserStore>, password_policy: PasswordPolicy) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                store,
                password_policy,
            }),
        }
    }

    /// Get a reference to the user store.
    #[must_use]
    pub fn store(&self) -> &dyn UserStore {
        self.inner.store.as_ref()
    }

    /// Password rules for create and update.
    #[must_use]
    pub fn password_policy(&self) -> PasswordPolicy {
        self.inner.password_policy
    }

    /// Account service bound to this state's store.
    #[must_use]
    pub fn accounts(&self) -> AccountService<'_> {
        AccountService::new(self.store(), self.password_policy())
    }

    /// Authentication service bound to this state's store.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(self.store())
    }
}
