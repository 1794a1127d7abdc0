//! Seed the database with a demo user and carts.
//!
//! The demo user is created on first run and reused afterwards; each run
//! opens `carts` new carts for it.

use accounts_core::Email;

use accounts_api::db::{PgStore, UserStore};
use accounts_api::models::NewUser;
use accounts_api::services::{AccountService, PasswordPolicy};

use super::{CliError, connect};

const DEMO_USERNAME: &str = "demo";
const DEMO_PASSWORD: &str = "demo-password";

/// Create (or reuse) the demo user and open carts for it.
pub async fn run(email: &str, carts: u32) -> Result<(), CliError> {
    let parsed = Email::parse(email).map_err(|e| CliError::InvalidArgument(e.to_string()))?;
    let store = PgStore::new(connect().await?);

    let user = match store.get_credentials(&parsed).await? {
        Some((user, _)) => {
            tracing::info!(user_id = %user.id, "Reusing existing demo user");
            user
        }
        None => {
            let user = AccountService::new(&store, PasswordPolicy::default())
                .create(NewUser {
                    username: Some(DEMO_USERNAME.to_owned()),
                    first_name: Some("Demo".to_owned()),
                    last_name: Some("User".to_owned()),
                    email: Some(parsed.into_inner()),
                    password: Some(DEMO_PASSWORD.to_owned()),
                    ..NewUser::default()
                })
                .await?;
            tracing::info!(user_id = %user.id, "Created demo user (password: {DEMO_PASSWORD})");
            user
        }
    };

    for _ in 0..carts {
        let cart = store.create_cart(user.id).await?;
        tracing::info!(cart_id = %cart.id, "Opened cart");
    }

    let total = store.list_carts(user.id).await?.len();
    tracing::info!(user_id = %user.id, carts = total, "Seed complete");
    Ok(())
}
