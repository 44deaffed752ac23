//! Subscription service: parsed commands in, ledger mutations and one
//! confirmation message out.
//!
//! Every handler resolves the sender's intent against the store catalog,
//! performs at most one ledger mutation, and tells the sender what happened.
//! "Store not found" is a conversation with the sender, not an error to the
//! caller; only ledger and delivery failures surface as [`ServiceError`].

use thiserror::Error;
use tracing::{debug, info, instrument};

use dropcast_core::Platform;

use crate::db::RepositoryError;
use crate::ledger::Ledger;
use crate::notify::{DeliveryError, Notifier};
use crate::telegram::{
    Command, CommandKind, build_help_message, build_store_not_found_message,
    build_subscribed_message, build_unsubscribed_message, build_usage_message,
};

/// Identity of the message sender, as seen by the webhook.
#[derive(Debug, Clone)]
pub struct Sender {
    /// Platform chat id, stored as the opaque external user id.
    pub chat_id: String,
    /// Optional display name, snapshotted onto the subscription.
    pub username: Option<String>,
}

/// Failures the webhook path logs and converts into a negative ack flag.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Ledger read/write failed.
    #[error("ledger error: {0}")]
    Ledger(#[from] RepositoryError),

    /// The confirmation/error message could not be delivered to the sender.
    #[error("delivery error: {0}")]
    Delivery(#[from] DeliveryError),
}

/// Handles subscribe/unsubscribe/help intents for one platform.
pub struct SubscriptionService<L, N> {
    ledger: L,
    notifier: N,
    /// The platform this service instance serves; becomes part of every
    /// subscription key it touches.
    platform: Platform,
}

impl<L: Ledger, N: Notifier> SubscriptionService<L, N> {
    /// Create a new subscription service.
    #[must_use]
    pub const fn new(ledger: L, notifier: N, platform: Platform) -> Self {
        Self {
            ledger,
            notifier,
            platform,
        }
    }

    /// Dispatch a parsed command to its handler.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] on ledger or delivery failure.
    pub async fn handle_command(
        &self,
        command: Command,
        sender: &Sender,
    ) -> Result<(), ServiceError> {
        match command {
            Command::DeepLinkSubscribe { slug } => {
                self.handle_deep_link_subscribe(&slug, sender).await
            }
            Command::Subscribe { slug } => self.handle_subscribe(&slug, sender).await,
            Command::Unsubscribe { slug } => self.handle_unsubscribe(&slug, sender).await,
            Command::Help => self.handle_help(sender).await,
            Command::UsageError(kind) => self.handle_usage_error(kind, sender).await,
            Command::NoOp => Ok(()),
        }
    }

    /// Subscribe the sender to the store behind `slug`.
    ///
    /// The upsert is idempotent: a repeat subscribe refreshes the username
    /// snapshot and confirms again instead of erroring.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] on ledger or delivery failure.
    #[instrument(skip(self, sender), fields(slug = %slug, chat_id = %sender.chat_id))]
    pub async fn handle_subscribe(&self, slug: &str, sender: &Sender) -> Result<(), ServiceError> {
        let Some(store) = self.ledger.find_store_by_slug(slug).await? else {
            debug!("subscribe to unknown store slug");
            self.notifier
                .send_text(&sender.chat_id, &build_store_not_found_message(slug))
                .await?;
            return Ok(());
        };

        self.ledger
            .upsert_subscription(
                store.id,
                self.platform,
                &sender.chat_id,
                sender.username.as_deref(),
            )
            .await?;

        info!(store_id = %store.id, "subscriber added");

        self.notifier
            .send_text(&sender.chat_id, &build_subscribed_message(&store.name))
            .await?;

        Ok(())
    }

    /// Deep-link subscribe: same effect as [`Self::handle_subscribe`],
    /// reached via first contact instead of an explicit command.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] on ledger or delivery failure.
    #[instrument(skip(self, sender), fields(slug = %slug, chat_id = %sender.chat_id))]
    pub async fn handle_deep_link_subscribe(
        &self,
        slug: &str,
        sender: &Sender,
    ) -> Result<(), ServiceError> {
        self.handle_subscribe(slug, sender).await
    }

    /// Unsubscribe the sender from the store behind `slug`.
    ///
    /// Deleting zero records is success; unsubscribing twice is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] on ledger or delivery failure.
    #[instrument(skip(self, sender), fields(slug = %slug, chat_id = %sender.chat_id))]
    pub async fn handle_unsubscribe(
        &self,
        slug: &str,
        sender: &Sender,
    ) -> Result<(), ServiceError> {
        let Some(store) = self.ledger.find_store_by_slug(slug).await? else {
            debug!("unsubscribe from unknown store slug");
            self.notifier
                .send_text(&sender.chat_id, &build_store_not_found_message(slug))
                .await?;
            return Ok(());
        };

        let removed = self
            .ledger
            .delete_subscriptions(store.id, self.platform, &sender.chat_id)
            .await?;

        info!(store_id = %store.id, removed, "subscriber removed");

        self.notifier
            .send_text(&sender.chat_id, &build_unsubscribed_message(&store.name))
            .await?;

        Ok(())
    }

    /// Send the static help text. No ledger access.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] on delivery failure.
    pub async fn handle_help(&self, sender: &Sender) -> Result<(), ServiceError> {
        self.notifier
            .send_text(&sender.chat_id, &build_help_message())
            .await?;
        Ok(())
    }

    /// Send the usage hint for a command missing its argument. No ledger
    /// access, and not logged as a system error.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] on delivery failure.
    pub async fn handle_usage_error(
        &self,
        kind: CommandKind,
        sender: &Sender,
    ) -> Result<(), ServiceError> {
        self.notifier
            .send_text(&sender.chat_id, &build_usage_message(kind))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telegram::parse_command;
    use crate::testing::{FakeLedger, RecordingNotifier, SentMessage};

    fn service(
        ledger: &FakeLedger,
        notifier: &RecordingNotifier,
    ) -> SubscriptionService<FakeLedger, RecordingNotifier> {
        SubscriptionService::new(ledger.clone(), notifier.clone(), Platform::Telegram)
    }

    fn sender(chat_id: &str) -> Sender {
        Sender {
            chat_id: chat_id.to_owned(),
            username: Some("ada".to_owned()),
        }
    }

    #[tokio::test]
    async fn test_subscribe_creates_record_and_confirms() {
        let ledger = FakeLedger::default();
        let notifier = RecordingNotifier::default();
        let store_id = ledger.insert_store("Lunar Gear", "lunargear");

        let command = parse_command(Some("/subscribe lunargear"));
        service(&ledger, &notifier)
            .handle_command(command, &sender("12345"))
            .await
            .expect("handled");

        let subscriptions = ledger.subscriptions();
        assert_eq!(subscriptions.len(), 1);
        let sub = subscriptions.first().expect("one record");
        assert_eq!(sub.store_id, store_id);
        assert_eq!(sub.platform, Platform::Telegram);
        assert_eq!(sub.external_user_id, "12345");
        assert_eq!(sub.username.as_deref(), Some("ada"));

        match notifier.sent().first() {
            Some(SentMessage::Text { chat_id, text }) => {
                assert_eq!(chat_id, "12345");
                assert!(text.contains("Lunar Gear"));
            }
            other => panic!("expected confirmation text, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_subscribe_twice_is_idempotent() {
        let ledger = FakeLedger::default();
        let notifier = RecordingNotifier::default();
        ledger.insert_store("Lunar Gear", "lunargear");
        let service = service(&ledger, &notifier);

        service
            .handle_subscribe("lunargear", &sender("12345"))
            .await
            .expect("first subscribe");
        let renamed = Sender {
            chat_id: "12345".to_owned(),
            username: Some("ada_v2".to_owned()),
        };
        service
            .handle_subscribe("lunargear", &renamed)
            .await
            .expect("second subscribe");

        let subscriptions = ledger.subscriptions();
        assert_eq!(subscriptions.len(), 1, "no duplicate record");
        // Re-subscribe refreshes the display name snapshot.
        assert_eq!(
            subscriptions.first().and_then(|s| s.username.clone()),
            Some("ada_v2".to_owned())
        );
    }

    #[tokio::test]
    async fn test_subscribe_unknown_store_tells_sender_without_mutating() {
        let ledger = FakeLedger::default();
        let notifier = RecordingNotifier::default();

        service(&ledger, &notifier)
            .handle_subscribe("nope", &sender("12345"))
            .await
            .expect("handled");

        assert!(ledger.subscriptions().is_empty());
        match notifier.sent().first() {
            Some(SentMessage::Text { text, .. }) => {
                assert!(text.contains("'nope' not found"));
            }
            other => panic!("expected not-found text, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_deep_link_subscribe_matches_explicit_subscribe() {
        let ledger = FakeLedger::default();
        let notifier = RecordingNotifier::default();
        ledger.insert_store("Lunar Gear", "lunargear");

        let command = parse_command(Some("/start subscribe_lunargear"));
        service(&ledger, &notifier)
            .handle_command(command, &sender("12345"))
            .await
            .expect("handled");

        assert_eq!(ledger.subscriptions().len(), 1);
    }

    #[tokio::test]
    async fn test_unsubscribe_removes_record_and_confirms() {
        let ledger = FakeLedger::default();
        let notifier = RecordingNotifier::default();
        ledger.insert_store("Lunar Gear", "lunargear");
        let service = service(&ledger, &notifier);

        service
            .handle_subscribe("lunargear", &sender("12345"))
            .await
            .expect("subscribe");
        service
            .handle_command(
                parse_command(Some("/unsubscribe lunargear")),
                &sender("12345"),
            )
            .await
            .expect("unsubscribe");

        assert!(ledger.subscriptions().is_empty());
        match notifier.sent().last() {
            Some(SentMessage::Text { chat_id, text }) => {
                assert_eq!(chat_id, "12345");
                assert!(text.contains("Unsubscribed from Lunar Gear"));
            }
            other => panic!("expected unsubscribe confirmation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unsubscribe_without_subscription_is_success() {
        let ledger = FakeLedger::default();
        let notifier = RecordingNotifier::default();
        ledger.insert_store("Lunar Gear", "lunargear");

        service(&ledger, &notifier)
            .handle_unsubscribe("lunargear", &sender("12345"))
            .await
            .expect("idempotent unsubscribe");

        assert!(ledger.subscriptions().is_empty());
        assert_eq!(notifier.sent().len(), 1, "still confirms to the sender");
    }

    #[tokio::test]
    async fn test_unsubscribe_only_touches_the_senders_record() {
        let ledger = FakeLedger::default();
        let notifier = RecordingNotifier::default();
        ledger.insert_store("Lunar Gear", "lunargear");
        let service = service(&ledger, &notifier);

        service
            .handle_subscribe("lunargear", &sender("111"))
            .await
            .expect("subscribe 111");
        service
            .handle_subscribe("lunargear", &sender("222"))
            .await
            .expect("subscribe 222");
        service
            .handle_unsubscribe("lunargear", &sender("111"))
            .await
            .expect("unsubscribe 111");

        let remaining = ledger.subscriptions();
        assert_eq!(remaining.len(), 1);
        assert_eq!(
            remaining.first().map(|s| s.external_user_id.clone()),
            Some("222".to_owned())
        );
    }

    #[tokio::test]
    async fn test_help_and_usage_send_static_texts() {
        let ledger = FakeLedger::default();
        let notifier = RecordingNotifier::default();
        let service = service(&ledger, &notifier);

        service
            .handle_command(parse_command(Some("/help")), &sender("12345"))
            .await
            .expect("help");
        service
            .handle_command(parse_command(Some("/subscribe")), &sender("12345"))
            .await
            .expect("usage");

        let sent = notifier.sent();
        assert_eq!(sent.len(), 2);
        match sent.last() {
            Some(SentMessage::Text { text, .. }) => assert!(text.starts_with("⚠️ Usage:")),
            other => panic!("expected usage text, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_noop_sends_nothing() {
        let ledger = FakeLedger::default();
        let notifier = RecordingNotifier::default();

        service(&ledger, &notifier)
            .handle_command(Command::NoOp, &sender("12345"))
            .await
            .expect("noop");

        assert!(notifier.sent().is_empty());
        assert!(ledger.subscriptions().is_empty());
    }

    #[tokio::test]
    async fn test_delivery_failure_surfaces_as_service_error() {
        let ledger = FakeLedger::default();
        let notifier = RecordingNotifier::default();
        ledger.insert_store("Lunar Gear", "lunargear");
        notifier.fail_for("12345");

        let result = service(&ledger, &notifier)
            .handle_subscribe("lunargear", &sender("12345"))
            .await;

        assert!(matches!(result, Err(ServiceError::Delivery(_))));
        // The ledger mutation happened before the confirmation failed.
        assert_eq!(ledger.subscriptions().len(), 1);
    }
}
