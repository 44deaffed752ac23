//! Telegram Bot API client.
//!
//! A thin sender: one call per outbound message, failures mapped onto the
//! [`DeliveryError`] taxonomy, no retries.

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{debug, instrument};

use super::types::{ApiResponse, SendMessageRequest, SendPhotoRequest};
use crate::notify::{DeliveryError, Notifier};

/// Telegram Bot API base URL.
const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Captions use Telegram's legacy Markdown flavor, matching the format the
/// drop caption is built with.
const CAPTION_PARSE_MODE: &str = "Markdown";

/// Telegram Bot API client for sending messages and photos.
#[derive(Clone)]
pub struct TelegramClient {
    /// HTTP client.
    client: Client,
    /// Bot token for authentication; part of every request URL.
    bot_token: SecretString,
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("bot_token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl TelegramClient {
    /// Create a new Telegram client.
    #[must_use]
    pub fn new(bot_token: SecretString) -> Self {
        Self {
            client: Client::new(),
            bot_token,
        }
    }

    /// Call one Bot API method and interpret the response envelope.
    async fn call<B: Serialize>(&self, method: &str, body: &B) -> Result<(), DeliveryError> {
        let url = format!(
            "{TELEGRAM_API_BASE}/bot{token}/{method}",
            token = self.bot_token.expose_secret()
        );

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| DeliveryError::Network(e.to_string()))?;

        let result: ApiResponse = response
            .json()
            .await
            .map_err(|e| DeliveryError::Response(e.to_string()))?;

        if result.ok {
            debug!(method, "Telegram API call succeeded");
            return Ok(());
        }

        let description = result
            .description
            .unwrap_or_else(|| "Unknown error".to_string());

        Err(match result.error_code {
            // The user blocked the bot, or the chat id no longer resolves.
            Some(403) => DeliveryError::Blocked(description),
            Some(429) => DeliveryError::RateLimited {
                retry_after: result.parameters.and_then(|p| p.retry_after),
            },
            code => DeliveryError::Api { code, description },
        })
    }
}

impl Notifier for TelegramClient {
    /// Send a plain text message via `sendMessage`.
    ///
    /// # Errors
    ///
    /// Returns a [`DeliveryError`] if the request fails or Telegram rejects it.
    #[instrument(skip(self, text), fields(chat_id = %chat_id))]
    async fn send_text(&self, chat_id: &str, text: &str) -> Result<(), DeliveryError> {
        self.call("sendMessage", &SendMessageRequest { chat_id, text })
            .await
    }

    /// Send an image with a caption via `sendPhoto`.
    ///
    /// # Errors
    ///
    /// Returns a [`DeliveryError`] if the request fails or Telegram rejects it.
    #[instrument(skip(self, photo_url, caption), fields(chat_id = %chat_id))]
    async fn send_photo(
        &self,
        chat_id: &str,
        photo_url: &str,
        caption: &str,
    ) -> Result<(), DeliveryError> {
        self.call(
            "sendPhoto",
            &SendPhotoRequest {
                chat_id,
                photo: photo_url,
                caption,
                parse_mode: CAPTION_PARSE_MODE,
            },
        )
        .await
    }
}
