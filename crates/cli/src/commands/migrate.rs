//! Database migration command.
//!
//! # Environment Variables
//!
//! - `DROPCAST_DATABASE_URL` - `PostgreSQL` connection string
//!
//! Migration files live in `crates/server/migrations/` and are embedded at
//! compile time.

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use tracing::info;

/// Errors that can occur while migrating.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run server database migrations.
///
/// # Errors
///
/// Returns an error if `DROPCAST_DATABASE_URL` is unset, the database is
/// unreachable, or a migration fails.
pub async fn run() -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DROPCAST_DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| MigrationError::MissingEnvVar("DROPCAST_DATABASE_URL"))?;

    info!("Connecting to database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    info!("Migrations complete!");
    Ok(())
}
