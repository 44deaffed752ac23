//! Seed the database with a demo store and drop.
//!
//! Store/drop CRUD lives outside this service, so local development needs a
//! way to get a publishable drop into the database. Seeding is idempotent on
//! the store slug.

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use tracing::info;

use dropcast_core::{DropId, OwnerId, StoreId};

/// Errors that can occur while seeding.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Insert a demo store with one unpublished drop.
///
/// # Errors
///
/// Returns an error if `DROPCAST_DATABASE_URL` is unset or a query fails.
pub async fn demo_store(name: &str, slug: &str) -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DROPCAST_DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| SeedError::MissingEnvVar("DROPCAST_DATABASE_URL"))?;

    let pool = PgPool::connect(database_url.expose_secret()).await?;

    let store_id: StoreId = sqlx::query_scalar(
        r"
        INSERT INTO stores (owner_id, name, slug)
        VALUES ($1, $2, $3)
        ON CONFLICT (slug) DO UPDATE SET name = EXCLUDED.name
        RETURNING id
        ",
    )
    .bind(OwnerId::generate())
    .bind(name)
    .bind(slug)
    .fetch_one(&pool)
    .await?;

    let drop_id: DropId = sqlx::query_scalar(
        r"
        INSERT INTO drops (store_id, title, description, image_url, price, product_url)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        ",
    )
    .bind(store_id)
    .bind("Demo Drop")
    .bind("A very limited demo release")
    .bind("https://picsum.photos/800/600")
    .bind("$49")
    .bind(format!("https://example.com/{slug}/demo-drop"))
    .fetch_one(&pool)
    .await?;

    info!(%store_id, %drop_id, slug, "Seed complete");
    info!("Publish the drop with: POST /api/drops/{drop_id}/publish");
    Ok(())
}
