//! Telegram Bot API wire types.
//!
//! These types represent the subset of the Bot API needed for command intake
//! and notification sending.
//!
//! See: <https://core.telegram.org/bots/api>

use serde::{Deserialize, Serialize};

/// An inbound update delivered to the webhook.
///
/// Unknown fields are ignored; everything beyond the message is irrelevant
/// to command parsing.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

/// A chat message inside an update.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub chat: Chat,
    pub text: Option<String>,
}

/// The chat a message was sent in.
///
/// For the private chats this bot handles, `id` doubles as the sender's
/// stable identifier.
#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
    pub username: Option<String>,
}

/// Body of a `sendMessage` call.
#[derive(Debug, Serialize)]
pub struct SendMessageRequest<'a> {
    pub chat_id: &'a str,
    pub text: &'a str,
}

/// Body of a `sendPhoto` call.
#[derive(Debug, Serialize)]
pub struct SendPhotoRequest<'a> {
    pub chat_id: &'a str,
    pub photo: &'a str,
    pub caption: &'a str,
    pub parse_mode: &'static str,
}

/// Envelope every Bot API method responds with.
#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    pub ok: bool,
    pub error_code: Option<i64>,
    pub description: Option<String>,
    pub parameters: Option<ResponseParameters>,
}

/// Extra failure detail Telegram attaches to some errors.
#[derive(Debug, Deserialize)]
pub struct ResponseParameters {
    pub retry_after: Option<u64>,
}
