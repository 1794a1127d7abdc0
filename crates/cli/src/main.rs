//! Accounts CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! accounts-cli migrate
//!
//! # Create a user
//! accounts-cli user create -u pine -e ada@example.com -f Ada -l Apple -p 'long-password'
//!
//! # Create a demo user with three carts
//! accounts-cli seed --carts 3
//! ```
//!
//! # Environment Variables
//!
//! - `ACCOUNTS_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

use accounts_api::services::password::DEFAULT_MIN_PASSWORD_LENGTH;

mod commands;

#[derive(Parser)]
#[command(name = "accounts-cli")]
#[command(author, version, about = "Accounts service CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Create a demo user with carts
    Seed {
        /// Number of carts to open for the demo user
        #[arg(short, long, default_value_t = 2)]
        carts: u32,

        /// Demo user email address
        #[arg(short, long, default_value = "demo@example.com")]
        email: String,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Unique username
        #[arg(short, long)]
        username: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// First name
        #[arg(short, long)]
        first_name: String,

        /// Last name
        #[arg(short, long)]
        last_name: String,

        /// Plaintext password, hashed before storage
        #[arg(short, long)]
        password: String,

        /// Minimum password length to enforce
        #[arg(long, default_value_t = DEFAULT_MIN_PASSWORD_LENGTH)]
        min_password_length: usize,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::User { action } => match action {
            UserAction::Create {
                username,
                email,
                first_name,
                last_name,
                password,
                min_password_length,
            } => {
                commands::user::create(
                    commands::user::CreateUser {
                        username,
                        email,
                        first_name,
                        last_name,
                        password,
                    },
                    min_password_length,
                )
                .await?;
            }
        },
        Commands::Seed { carts, email } => commands::seed::run(&email, carts).await?,
    }
    Ok(())
}
