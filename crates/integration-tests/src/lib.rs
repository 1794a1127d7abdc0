//! Integration tests for the accounts API.
//!
//! The tests talk to a running server over HTTP and are ignored by default.
//!
//! # Running Tests
//!
//! ```bash
//! ACCOUNTS_STORE=memory cargo run -p accounts-api &
//! cargo test -p accounts-integration-tests -- --ignored
//! ```
//!
//! Set `ACCOUNTS_TEST_URL` to target a server other than
//! `http://127.0.0.1:3001`.

use reqwest::Client;
use serde_json::{Value, json};
use uuid::Uuid;

/// Password used for every user created by these tests.
pub const TEST_PASSWORD: &str = "integration-pw";

/// Base URL of the server under test.
#[must_use]
pub fn base_url() -> String {
    std::env::var("ACCOUNTS_TEST_URL").unwrap_or_else(|_| "http://127.0.0.1:3001".to_string())
}

/// A client that keeps cookies between requests, like a browser would.
///
/// # Panics
///
/// Panics if the TLS backend cannot be initialized.
#[must_use]
pub fn session_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Create-user body with a unique username and email.
#[must_use]
pub fn unique_user() -> Value {
    let suffix = Uuid::new_v4().simple().to_string();
    json!({
        "username": format!("it-{suffix}"),
        "first_name": "Integration",
        "last_name": "Test",
        "email": format!("it-{suffix}@example.com"),
        "password": TEST_PASSWORD,
    })
}
