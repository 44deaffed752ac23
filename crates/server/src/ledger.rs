//! The subscription ledger seam.
//!
//! [`Ledger`] is the storage interface the subscription service and the
//! fan-out dispatcher are written against. The production implementation is
//! [`crate::db::PgLedger`]; unit tests substitute an in-memory fake. The
//! services are generic over this trait and monomorphized over the concrete
//! implementation, so there is no dynamic dispatch on the hot path.

use chrono::{DateTime, Utc};

use dropcast_core::{DropId, Platform, StoreId};

use crate::db::RepositoryError;
use crate::models::{ProductDrop, Store, Subscription};

/// Keyed storage for stores, drops, and subscription records.
///
/// Implementations must make [`Ledger::upsert_subscription`] atomic
/// (a native upsert or compare-and-swap), never a read-then-write: the
/// idempotency contract has to hold under concurrent duplicate requests.
pub trait Ledger {
    /// Look up a store by its public slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the underlying store fails.
    async fn find_store_by_slug(&self, slug: &str) -> Result<Option<Store>, RepositoryError>;

    /// Look up a store by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the underlying store fails.
    async fn find_store_by_id(&self, id: StoreId) -> Result<Option<Store>, RepositoryError>;

    /// Look up a drop by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the underlying store fails.
    async fn find_drop_by_id(&self, id: DropId) -> Result<Option<ProductDrop>, RepositoryError>;

    /// Create a subscription for `(store_id, platform, external_user_id)`,
    /// or refresh the username snapshot if one already exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the write fails. An existing record is
    /// not an error.
    async fn upsert_subscription(
        &self,
        store_id: StoreId,
        platform: Platform,
        external_user_id: &str,
        username: Option<&str>,
    ) -> Result<(), RepositoryError>;

    /// Delete all subscriptions matching the key. Returns the number of rows
    /// removed; zero matches is not an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the write fails.
    async fn delete_subscriptions(
        &self,
        store_id: StoreId,
        platform: Platform,
        external_user_id: &str,
    ) -> Result<u64, RepositoryError>;

    /// All current subscribers of a store on the given platform.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the read fails.
    async fn list_subscriptions(
        &self,
        store_id: StoreId,
        platform: Platform,
    ) -> Result<Vec<Subscription>, RepositoryError>;

    /// Set the drop's published timestamp.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the write fails.
    async fn mark_drop_published(
        &self,
        id: DropId,
        published_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError>;
}
