//! Fan-out dispatcher: one published drop, one notification per subscriber.
//!
//! Per-recipient failures are isolated: a blocked user or a rate limit on one
//! send never aborts or delays the others, and the drop is marked published
//! after all attempts settle regardless of how many succeeded. Retrying
//! failed sends is an operational concern outside this service.

use chrono::Utc;
use futures::StreamExt;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use dropcast_core::{DropId, Platform};

use crate::db::RepositoryError;
use crate::ledger::Ledger;
use crate::models::{ProductDrop, Subscription};
use crate::notify::Notifier;
use crate::telegram::build_drop_caption;

/// How many notification sends may be in flight at once. Keeps the fan-out
/// under Telegram's per-bot rate limits while still overlapping slow
/// recipients.
const FANOUT_CONCURRENCY: usize = 8;

/// Errors that abort a fan-out invocation before any counting is meaningful.
#[derive(Debug, Error)]
pub enum FanoutError {
    /// The drop id does not resolve.
    #[error("drop not found: {0}")]
    DropNotFound(DropId),

    /// Ledger access failed. When this happens on the subscriber-list read,
    /// zero notifications were attempted.
    #[error("ledger error: {0}")]
    Ledger(#[from] RepositoryError),
}

/// Per-invocation outcome summary returned to the publish caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FanoutReport {
    /// Sends attempted (one per subscriber at read time).
    pub attempted: usize,
    /// Sends the platform accepted.
    pub succeeded: usize,
    /// Sends that failed; already logged per recipient.
    pub failed: usize,
}

/// Broadcasts a published drop to every subscriber of its store.
pub struct FanoutService<L, N> {
    ledger: L,
    notifier: N,
}

impl<L: Ledger, N: Notifier> FanoutService<L, N> {
    /// Create a new fan-out service.
    #[must_use]
    pub const fn new(ledger: L, notifier: N) -> Self {
        Self { ledger, notifier }
    }

    /// Publish a drop: notify every subscriber of its store on `platform`,
    /// then set the drop's published timestamp.
    ///
    /// Re-invoking on an already-published drop deliberately re-sends; the
    /// caller decides whether a second publish should happen at all.
    ///
    /// # Errors
    ///
    /// Returns [`FanoutError::DropNotFound`] for an unknown drop and
    /// [`FanoutError::Ledger`] if the subscriber list cannot be read or the
    /// published timestamp cannot be written. Individual delivery failures
    /// are counted in the report, never returned as errors.
    #[instrument(skip(self), fields(drop_id = %drop_id, platform = %platform))]
    pub async fn publish_drop(
        &self,
        drop_id: DropId,
        platform: Platform,
    ) -> Result<FanoutReport, FanoutError> {
        let drop = self
            .ledger
            .find_drop_by_id(drop_id)
            .await?
            .ok_or(FanoutError::DropNotFound(drop_id))?;

        if drop.published_at.is_some() {
            debug!("drop already published; re-publishing re-sends");
        }

        let store = self
            .ledger
            .find_store_by_id(drop.store_id)
            .await?
            .ok_or_else(|| {
                RepositoryError::DataCorruption(format!(
                    "drop {drop_id} references missing store {}",
                    drop.store_id
                ))
            })?;

        let subscribers = self.ledger.list_subscriptions(drop.store_id, platform).await?;
        let caption = build_drop_caption(&drop);

        let drop_ref = &drop;
        let caption_ref = caption.as_str();
        let outcomes: Vec<bool> = futures::stream::iter(subscribers)
            .map(|subscriber| async move {
                self.notify_subscriber(&subscriber, drop_ref, caption_ref).await
            })
            .buffer_unordered(FANOUT_CONCURRENCY)
            .collect()
            .await;

        let attempted = outcomes.len();
        let succeeded = outcomes.iter().filter(|delivered| **delivered).count();
        let report = FanoutReport {
            attempted,
            succeeded,
            failed: attempted - succeeded,
        };

        // Publication is a fact about the drop, not about delivery: it is
        // recorded even when every send failed.
        self.ledger.mark_drop_published(drop_id, Utc::now()).await?;

        info!(
            store = %store.slug,
            attempted = report.attempted,
            succeeded = report.succeeded,
            failed = report.failed,
            "drop published"
        );

        Ok(report)
    }

    /// Send one notification; log and swallow the failure so siblings keep
    /// going.
    async fn notify_subscriber(
        &self,
        subscriber: &Subscription,
        drop: &ProductDrop,
        caption: &str,
    ) -> bool {
        match self
            .notifier
            .send_photo(&subscriber.external_user_id, &drop.image_url, caption)
            .await
        {
            Ok(()) => true,
            Err(error) => {
                warn!(
                    recipient = %subscriber.external_user_id,
                    %error,
                    "drop notification failed"
                );
                false
            }
        }
    }
}
