//! Accounts API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ACCOUNTS_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`). Not needed when `ACCOUNTS_STORE=memory`.
//!
//! ## Optional
//! - `ACCOUNTS_STORE` - `postgres` (default) or `memory`
//! - `ACCOUNTS_HOST` - Bind address (default: 127.0.0.1)
//! - `ACCOUNTS_PORT` - Listen port (default: 3001)
//! - `ACCOUNTS_BASE_URL` - Public URL; `https://` marks the session cookie `Secure`
//! - `ACCOUNTS_MIN_PASSWORD_LENGTH` - Minimum password length (default: 8)
//! - `ACCOUNTS_SESSION_IDLE_MINUTES` - Session inactivity timeout (default: 120)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;

use crate::services::password::{DEFAULT_MIN_PASSWORD_LENGTH, PasswordPolicy};

const DEFAULT_SESSION_IDLE_MINUTES: i64 = 120;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Where users and sessions are persisted.
#[derive(Debug, Clone)]
pub enum StoreConfig {
    /// `PostgreSQL`, for users and sessions alike.
    Postgres {
        /// Connection URL (contains password)
        database_url: SecretString,
    },
    /// Process memory. Everything is lost on restart.
    Memory,
}

/// Session cookie settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Minutes of inactivity before a session expires
    pub idle_minutes: i64,
    /// Whether the cookie carries the `Secure` attribute
    pub secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_minutes: DEFAULT_SESSION_IDLE_MINUTES,
            secure: false,
        }
    }
}

/// Accounts API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Persistence backend
    pub store: StoreConfig,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL
    pub base_url: String,
    /// Session cookie settings
    pub session: SessionConfig,
    /// Password rules applied on create and update
    pub password: PasswordPolicy,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let store = match get_env_or_default("ACCOUNTS_STORE", "postgres").as_str() {
            "postgres" => StoreConfig::Postgres {
                database_url: get_database_url("ACCOUNTS_DATABASE_URL")?,
            },
            "memory" => StoreConfig::Memory,
            other => {
                return Err(ConfigError::InvalidEnvVar(
                    "ACCOUNTS_STORE".to_string(),
                    format!("expected 'postgres' or 'memory', got '{other}'"),
                ));
            }
        };

        let host: IpAddr = parse_env("ACCOUNTS_HOST", "127.0.0.1")?;
        let port: u16 = parse_env("ACCOUNTS_PORT", "3001")?;
        let base_url = get_optional_env("ACCOUNTS_BASE_URL")
            .unwrap_or_else(|| format!("http://{}", SocketAddr::new(host, port)));

        let min_length: usize = parse_env(
            "ACCOUNTS_MIN_PASSWORD_LENGTH",
            &DEFAULT_MIN_PASSWORD_LENGTH.to_string(),
        )?;
        let password = password_policy(min_length)?;

        let idle_minutes: i64 = parse_env(
            "ACCOUNTS_SESSION_IDLE_MINUTES",
            &DEFAULT_SESSION_IDLE_MINUTES.to_string(),
        )?;
        if idle_minutes < 1 {
            return Err(ConfigError::InvalidEnvVar(
                "ACCOUNTS_SESSION_IDLE_MINUTES".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let session = SessionConfig {
            idle_minutes,
            secure: is_https(&base_url),
        };

        Ok(Self {
            store,
            host,
            port,
            base_url,
            session,
            password,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
///
/// # Errors
///
/// Returns `ConfigError::MissingEnvVar` naming `primary_key` if neither is set.
pub fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read and parse an environment variable, using `default` when unset.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(key, &get_env_or_default(key, default))
}

fn parse_value<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn password_policy(min_length: usize) -> Result<PasswordPolicy, ConfigError> {
    if min_length == 0 {
        return Err(ConfigError::InvalidEnvVar(
            "ACCOUNTS_MIN_PASSWORD_LENGTH".to_string(),
            "must be at least 1".to_string(),
        ));
    }
    Ok(PasswordPolicy { min_length })
}

fn is_https(base_url: &str) -> bool {
    base_url
        .get(..8)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("https://"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_trims() {
        let port: u16 = parse_value("ACCOUNTS_PORT", " 8080 ").unwrap();
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_parse_value_invalid() {
        let result = parse_value::<u16>("ACCOUNTS_PORT", "eighty");
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(key, _)) if key == "ACCOUNTS_PORT"));
    }

    #[test]
    fn test_password_policy_rejects_zero() {
        assert!(password_policy(0).is_err());
        assert_eq!(password_policy(12).unwrap().min_length, 12);
    }

    #[test]
    fn test_is_https() {
        assert!(is_https("https://accounts.example.com"));
        assert!(is_https("HTTPS://accounts.example.com"));
        assert!(!is_https("http://127.0.0.1:3001"));
        assert!(!is_https(""));
    }

    #[test]
    fn test_session_config_default() {
        let session = SessionConfig::default();
        assert_eq!(session.idle_minutes, 120);
        assert!(!session.secure);
    }

    #[test]
    fn test_debug_redacts_database_url() {
        let store = StoreConfig::Postgres {
            database_url: SecretString::from("postgres://user:hunter2@db/accounts"),
        };
        assert!(!format!("{store:?}").contains("hunter2"));
    }
}
