//! Run database migrations.

use std::path::Path;

use secrecy::SecretString;
use tracing::info;

use velour_api::db;

/// Location of the API crate's migration files, relative to the workspace
/// root the CLI is run from.
const MIGRATIONS_DIR: &str = "crates/api/migrations";

/// Apply all pending migrations.
///
/// # Errors
///
/// Returns an error if `DATABASE_URL` is missing, the migrations directory
/// cannot be read, or a migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| "DATABASE_URL not set")?;

    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let migrator = sqlx::migrate::Migrator::new(Path::new(MIGRATIONS_DIR)).await?;
    migrator.run(&pool).await?;

    info!("Migrations complete");
    Ok(())
}
