//! Session middleware configuration.
//!
//! The layer is generic over the session store: `PostgresStore` in
//! production, tower-sessions' `MemoryStore` in tests and memory mode.

use tower_sessions::{Expiry, SessionManagerLayer, SessionStore, cookie::SameSite, cookie::time};

use crate::config::SessionConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "accounts_session";

/// Create the session layer over `store`.
#[must_use]
pub fn create_session_layer<S>(store: S, config: &SessionConfig) -> SessionManagerLayer<S>
where
    S: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            config.idle_minutes,
        )))
        .with_secure(config.secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
