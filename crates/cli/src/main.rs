//! Velour CLI - Database migrations and seeding tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! velour-cli migrate
//!
//! # Seed the database with the sample catalog and an admin user
//! velour-cli seed --admin-email admin@example.com --admin-name Admin \
//!     --admin-password <password>
//!
//! # Clear all data without re-seeding
//! velour-cli seed --destroy
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Import sample data (or destroy all data with `--destroy`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "velour-cli")]
#[command(author, version, about = "Velour CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database with sample data
    Seed {
        /// Clear all data instead of importing
        #[arg(long)]
        destroy: bool,

        /// Admin email address
        #[arg(long, default_value = "admin@velour.shop")]
        admin_email: String,

        /// Admin display name
        #[arg(long, default_value = "Admin")]
        admin_name: String,

        /// Admin password (required unless --destroy)
        #[arg(long)]
        admin_password: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed {
            destroy,
            admin_email,
            admin_name,
            admin_password,
        } => {
            if destroy {
                commands::seed::destroy().await?;
            } else {
                let password = admin_password
                    .ok_or("--admin-password is required when importing seed data")?;
                commands::seed::import(&admin_name, &admin_email, &password).await?;
            }
        }
    }
    Ok(())
}
