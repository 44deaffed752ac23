//! Store model.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use dropcast_core::{OwnerId, StoreId};

/// A store that can publish drops.
///
/// Store records are created and managed by the surrounding CRUD layer; this
/// service only reads them, looked up by slug (bot commands, deep links) or
/// by id (fan-out).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Store {
    pub id: StoreId,
    /// Account that owns the store. Owner accounts live outside this service.
    pub owner_id: OwnerId,
    /// Human-readable store name, used in confirmation messages.
    pub name: String,
    /// Stable public reference used in commands and deep links.
    pub slug: String,
    pub created_at: DateTime<Utc>,
}
