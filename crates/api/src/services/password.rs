//! Argon2id password hashing and verification.
//!
//! Hashes are stored in PHC string format, so the algorithm parameters and the
//! random salt travel with the hash. Verification goes through
//! [`PasswordVerifier`], which compares digests in constant time.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

/// Default minimum password length when none is configured.
pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 8;

/// Password hashing failed, or a stored hash could not be parsed.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Argon2 rejected its input or the stored PHC string.
    #[error("password hash error: {0}")]
    Hash(argon2::password_hash::Error),

    /// The blocking hash task panicked or was cancelled.
    #[error("password hashing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Password rules enforced when a user is created or changes their password.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    /// Minimum number of characters.
    pub min_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_PASSWORD_LENGTH,
        }
    }
}

impl PasswordPolicy {
    /// Whether `password` satisfies the length rule.
    ///
    /// Length is counted in characters, not bytes.
    #[must_use]
    pub fn accepts(&self, password: &str) -> bool {
        password.chars().count() >= self.min_length
    }
}

/// Hash a password with Argon2id and a fresh random salt.
///
/// # Errors
///
/// Returns `PasswordError::Hash` if Argon2 fails.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(PasswordError::Hash)
}

/// Verify a password against a stored PHC hash.
///
/// Returns `Ok(false)` on mismatch.
///
/// # Errors
///
/// Returns `PasswordError::Hash` if the stored hash is malformed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(PasswordError::Hash)?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::Hash(e)),
    }
}

/// [`hash_password`] on the blocking thread pool.
///
/// # Errors
///
/// Returns `PasswordError` if hashing fails or the task is cancelled.
pub async fn hash_password_blocking(password: String) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_password(&password)).await?
}

/// [`verify_password`] on the blocking thread pool.
///
/// # Errors
///
/// Returns `PasswordError` if the hash is malformed or the task is cancelled.
pub async fn verify_password_blocking(password: String, hash: String) -> Result<bool, PasswordError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash)).await?
}
