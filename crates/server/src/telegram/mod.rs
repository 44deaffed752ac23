//! Telegram integration.
//!
//! This module provides:
//! - [`TelegramClient`] - the Bot API client implementing [`crate::notify::Notifier`]
//! - [`parse_command`] - the pure webhook-text command parser
//! - Wire types for inbound updates and outbound API calls
//!
//! # Flow
//!
//! 1. Telegram POSTs an update to `/api/webhooks/telegram`
//! 2. The route decodes the update and runs [`parse_command`] on the text
//! 3. The subscription service mutates the ledger and confirms to the sender
//! 4. On drop publication, the fan-out dispatcher sends a photo + caption to
//!    every subscriber through the same client

mod client;
mod commands;
mod messages;
mod types;

pub use client::TelegramClient;
pub use commands::{Command, CommandKind, parse_command};
pub use messages::{
    build_drop_caption, build_help_message, build_store_not_found_message,
    build_subscribed_message, build_unsubscribed_message, build_usage_message,
};
pub use types::{Chat, Message, Update};
