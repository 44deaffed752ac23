//! In-memory test doubles for the ledger and notifier seams.
//!
//! Shared by the service unit tests; compiled only for tests.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use dropcast_core::{DropId, Platform, StoreId, SubscriptionId};

use crate::db::RepositoryError;
use crate::ledger::Ledger;
use crate::models::{ProductDrop, Store, Subscription};
use crate::notify::{DeliveryError, Notifier};

/// In-memory [`Ledger`] with injectable listing failures.
///
/// Clones share state, so tests can keep a handle after moving a clone into
/// a service.
#[derive(Clone, Default)]
pub struct FakeLedger {
    state: Arc<Mutex<LedgerState>>,
}

#[derive(Default)]
struct LedgerState {
    stores: Vec<Store>,
    drops: Vec<ProductDrop>,
    subscriptions: Vec<Subscription>,
    fail_listings: bool,
}

impl FakeLedger {
    pub fn insert_store(&self, name: &str, slug: &str) -> StoreId {
        let id = StoreId::generate();
        self.state().stores.push(Store {
            id,
            owner_id: dropcast_core::OwnerId::generate(),
            name: name.to_owned(),
            slug: slug.to_owned(),
            created_at: Utc::now(),
        });
        id
    }

    pub fn insert_drop(&self, store_id: StoreId, title: &str, price: &str) -> DropId {
        let id = DropId::generate();
        self.state().drops.push(ProductDrop {
            id,
            store_id,
            title: title.to_owned(),
            description: "A very limited thing".to_owned(),
            image_url: "https://cdn.example.com/drop.jpg".to_owned(),
            price: price.to_owned(),
            product_url: "https://shop.example.com/drop".to_owned(),
            published_at: None,
            created_at: Utc::now(),
        });
        id
    }

    /// Make every `list_subscriptions` call fail with a database error.
    pub fn fail_listings(&self) {
        self.state().fail_listings = true;
    }

    pub fn subscriptions(&self) -> Vec<Subscription> {
        self.state().subscriptions.clone()
    }

    pub fn published_at(&self, drop_id: DropId) -> Option<DateTime<Utc>> {
        self.state()
            .drops
            .iter()
            .find(|d| d.id == drop_id)
            .and_then(|d| d.published_at)
    }

    pub fn set_published(&self, drop_id: DropId, at: DateTime<Utc>) {
        let mut state = self.state();
        if let Some(drop) = state.drops.iter_mut().find(|d| d.id == drop_id) {
            drop.published_at = Some(at);
        }
    }

    fn state(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().expect("ledger state poisoned")
    }
}

impl Ledger for FakeLedger {
    async fn find_store_by_slug(&self, slug: &str) -> Result<Option<Store>, RepositoryError> {
        Ok(self.state().stores.iter().find(|s| s.slug == slug).cloned())
    }

    async fn find_store_by_id(&self, id: StoreId) -> Result<Option<Store>, RepositoryError> {
        Ok(self.state().stores.iter().find(|s| s.id == id).cloned())
    }

    async fn find_drop_by_id(&self, id: DropId) -> Result<Option<ProductDrop>, RepositoryError> {
        Ok(self.state().drops.iter().find(|d| d.id == id).cloned())
    }

    async fn upsert_subscription(
        &self,
        store_id: StoreId,
        platform: Platform,
        external_user_id: &str,
        username: Option<&str>,
    ) -> Result<(), RepositoryError> {
        let mut state = self.state();
        if let Some(existing) = state.subscriptions.iter_mut().find(|s| {
            s.store_id == store_id
                && s.platform == platform
                && s.external_user_id == external_user_id
        }) {
            existing.username = username.map(str::to_owned);
        } else {
            state.subscriptions.push(Subscription {
                id: SubscriptionId::generate(),
                store_id,
                platform,
                external_user_id: external_user_id.to_owned(),
                username: username.map(str::to_owned),
                created_at: Utc::now(),
            });
        }
        Ok(())
    }

    async fn delete_subscriptions(
        &self,
        store_id: StoreId,
        platform: Platform,
        external_user_id: &str,
    ) -> Result<u64, RepositoryError> {
        let mut state = self.state();
        let before = state.subscriptions.len();
        state.subscriptions.retain(|s| {
            !(s.store_id == store_id
                && s.platform == platform
                && s.external_user_id == external_user_id)
        });
        Ok((before - state.subscriptions.len()) as u64)
    }

    async fn list_subscriptions(
        &self,
        store_id: StoreId,
        platform: Platform,
    ) -> Result<Vec<Subscription>, RepositoryError> {
        let state = self.state();
        if state.fail_listings {
            return Err(RepositoryError::Database(sqlx::Error::PoolClosed));
        }
        Ok(state
            .subscriptions
            .iter()
            .filter(|s| s.store_id == store_id && s.platform == platform)
            .cloned()
            .collect())
    }

    async fn mark_drop_published(
        &self,
        id: DropId,
        published_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        self.set_published(id, published_at);
        Ok(())
    }
}

/// An outbound message captured by [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentMessage {
    Text {
        chat_id: String,
        text: String,
    },
    Photo {
        chat_id: String,
        photo_url: String,
        caption: String,
    },
}

impl SentMessage {
    pub fn chat_id(&self) -> &str {
        match self {
            Self::Text { chat_id, .. } | Self::Photo { chat_id, .. } => chat_id,
        }
    }
}

/// [`Notifier`] that records sends and fails for chosen recipients.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<SentMessage>>>,
    failing: Arc<Mutex<HashSet<String>>>,
}

impl RecordingNotifier {
    /// Make every send to `chat_id` fail with a blocked-recipient error.
    pub fn fail_for(&self, chat_id: &str) {
        self.failing
            .lock()
            .expect("failing set poisoned")
            .insert(chat_id.to_owned());
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().expect("sent log poisoned").clone()
    }

    fn record(&self, message: SentMessage) -> Result<(), DeliveryError> {
        let chat_id = message.chat_id().to_owned();
        self.sent.lock().expect("sent log poisoned").push(message);
        if self
            .failing
            .lock()
            .expect("failing set poisoned")
            .contains(&chat_id)
        {
            return Err(DeliveryError::Blocked(format!(
                "bot was blocked by the user: {chat_id}"
            )));
        }
        Ok(())
    }
}

impl Notifier for RecordingNotifier {
    async fn send_text(&self, chat_id: &str, text: &str) -> Result<(), DeliveryError> {
        self.record(SentMessage::Text {
            chat_id: chat_id.to_owned(),
            text: text.to_owned(),
        })
    }

    async fn send_photo(
        &self,
        chat_id: &str,
        photo_url: &str,
        caption: &str,
    ) -> Result<(), DeliveryError> {
        self.record(SentMessage::Photo {
            chat_id: chat_id.to_owned(),
            photo_url: photo_url.to_owned(),
            caption: caption.to_owned(),
        })
    }
}
