//! Product drop model.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use dropcast_core::{DropId, StoreId};

/// A limited product release belonging to a store.
///
/// `published_at` stays `NULL` until the fan-out dispatcher marks the drop
/// published; publication state is independent of notification success.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProductDrop {
    pub id: DropId,
    pub store_id: StoreId,
    pub title: String,
    pub description: String,
    /// Image sent as the photo of the drop notification.
    pub image_url: String,
    /// Opaque display string (e.g. "$49.99"); no currency semantics here.
    pub price: String,
    /// Purchase link included in the notification caption.
    pub product_url: String,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
