//! Subscription model.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use dropcast_core::{Platform, StoreId, SubscriptionId};

/// One external identity's interest in notifications for one store on one
/// platform.
///
/// The triple `(store_id, platform, external_user_id)` is unique; a repeat
/// subscribe refreshes the username snapshot instead of creating a second
/// row.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub store_id: StoreId,
    pub platform: Platform,
    /// Platform-specific user identifier, treated as an opaque string.
    pub external_user_id: String,
    /// Display name snapshot taken at (re-)subscribe time.
    pub username: Option<String>,
    pub created_at: DateTime<Utc>,
}
