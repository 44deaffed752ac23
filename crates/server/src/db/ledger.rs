//! Postgres implementation of the subscription ledger.
//!
//! Queries use runtime-checked `query_as`/`query` with explicit binds; row
//! shapes are covered by `FromRow` derives on the models.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use dropcast_core::{DropId, Platform, StoreId};

use super::RepositoryError;
use crate::ledger::Ledger;
use crate::models::{ProductDrop, Store, Subscription};

/// Postgres-backed [`Ledger`].
#[derive(Debug, Clone)]
pub struct PgLedger {
    pool: PgPool,
}

impl PgLedger {
    /// Create a ledger over an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying connection pool (health checks, tests).
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl Ledger for PgLedger {
    async fn find_store_by_slug(&self, slug: &str) -> Result<Option<Store>, RepositoryError> {
        let store = sqlx::query_as::<_, Store>(
            r"
            SELECT id, owner_id, name, slug, created_at
            FROM stores
            WHERE slug = $1
            ",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(store)
    }

    async fn find_store_by_id(&self, id: StoreId) -> Result<Option<Store>, RepositoryError> {
        let store = sqlx::query_as::<_, Store>(
            r"
            SELECT id, owner_id, name, slug, created_at
            FROM stores
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(store)
    }

    async fn find_drop_by_id(&self, id: DropId) -> Result<Option<ProductDrop>, RepositoryError> {
        let drop = sqlx::query_as::<_, ProductDrop>(
            r"
            SELECT id, store_id, title, description, image_url, price,
                   product_url, published_at, created_at
            FROM drops
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(drop)
    }

    async fn upsert_subscription(
        &self,
        store_id: StoreId,
        platform: Platform,
        external_user_id: &str,
        username: Option<&str>,
    ) -> Result<(), RepositoryError> {
        // The unique constraint makes this atomic under concurrent duplicate
        // subscribes; only the username snapshot is refreshed on conflict.
        sqlx::query(
            r"
            INSERT INTO subscriptions (store_id, platform, external_user_id, username)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (store_id, platform, external_user_id)
            DO UPDATE SET username = EXCLUDED.username
            ",
        )
        .bind(store_id)
        .bind(platform)
        .bind(external_user_id)
        .bind(username)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_subscriptions(
        &self,
        store_id: StoreId,
        platform: Platform,
        external_user_id: &str,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM subscriptions
            WHERE store_id = $1 AND platform = $2 AND external_user_id = $3
            ",
        )
        .bind(store_id)
        .bind(platform)
        .bind(external_user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn list_subscriptions(
        &self,
        store_id: StoreId,
        platform: Platform,
    ) -> Result<Vec<Subscription>, RepositoryError> {
        let subscriptions = sqlx::query_as::<_, Subscription>(
            r"
            SELECT id, store_id, platform, external_user_id, username, created_at
            FROM subscriptions
            WHERE store_id = $1 AND platform = $2
            ORDER BY created_at
            ",
        )
        .bind(store_id)
        .bind(platform)
        .fetch_all(&self.pool)
        .await?;

        Ok(subscriptions)
    }

    async fn mark_drop_published(
        &self,
        id: DropId,
        published_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            UPDATE drops
            SET published_at = $2
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(published_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
