//! Outbound message builders for the subscription bot.
//!
//! Factory functions for every text the bot sends: command confirmations,
//! usage hints, and the drop notification caption.

use super::commands::CommandKind;
use crate::models::ProductDrop;

/// Usage hint for a recognized command that was missing its argument.
#[must_use]
pub fn build_usage_message(kind: CommandKind) -> String {
    match kind {
        CommandKind::Subscribe => {
            "⚠️ Usage:\n/start subscribe_<store-slug>\nOR\n/subscribe <store-slug>".to_owned()
        }
        CommandKind::Unsubscribe => "⚠️ Usage:\n/unsubscribe <store-slug>".to_owned(),
    }
}

/// Told to the sender when the referenced store slug does not resolve.
#[must_use]
pub fn build_store_not_found_message(slug: &str) -> String {
    format!("❌ Store '{slug}' not found")
}

/// Confirmation after a successful (or repeated) subscribe.
#[must_use]
pub fn build_subscribed_message(store_name: &str) -> String {
    format!("✅ Subscribed to {store_name}")
}

/// Confirmation after an unsubscribe, whether or not a record existed.
#[must_use]
pub fn build_unsubscribed_message(store_name: &str) -> String {
    format!("❌ Unsubscribed from {store_name}")
}

/// Static help text listing the commands the bot understands.
#[must_use]
pub fn build_help_message() -> String {
    "Dropcast keeps you posted when stores you follow release new drops.\n\n\
     /subscribe <store-slug> — get notified about a store's drops\n\
     /unsubscribe <store-slug> — stop notifications for a store\n\
     /help — show this message"
        .to_owned()
}

/// Caption for the drop notification photo (Markdown parse mode).
#[must_use]
pub fn build_drop_caption(drop: &ProductDrop) -> String {
    format!(
        "🔥 *{title}*\n{price}\n{description}\n[Buy now]({url})",
        title = drop.title,
        price = drop.price,
        description = drop.description,
        url = drop.product_url,
    )
}
