//! The outbound notifier seam.
//!
//! [`Notifier`] sends one message to one recipient on one platform and
//! reports failures through the [`DeliveryError`] taxonomy. It carries no
//! retry logic; retries are an operational concern of the caller. The
//! production implementation is [`crate::telegram::TelegramClient`]; unit
//! tests substitute a recording fake.

use thiserror::Error;

/// Why an outbound send to a specific recipient failed.
///
/// Delivery failures are isolated per recipient: the fan-out dispatcher
/// records them and keeps going, and the webhook path logs them without
/// surfacing an HTTP error.
#[derive(Debug, Clone, Error)]
pub enum DeliveryError {
    /// The HTTP request never completed (connect, timeout, TLS).
    #[error("request failed: {0}")]
    Network(String),

    /// The platform answered but the response could not be decoded.
    #[error("could not decode response: {0}")]
    Response(String),

    /// The recipient is invalid, or has blocked the bot.
    #[error("recipient unavailable: {0}")]
    Blocked(String),

    /// The platform asked us to slow down.
    #[error("rate limited by platform")]
    RateLimited {
        /// Seconds to wait, when the platform provides one.
        retry_after: Option<u64>,
    },

    /// Any other error reported by the platform API.
    #[error("platform API error: {description}")]
    Api {
        code: Option<i64>,
        description: String,
    },
}

/// Sends a single text or image+caption message to one external recipient.
pub trait Notifier {
    /// Send a plain text message.
    ///
    /// # Errors
    ///
    /// Returns a [`DeliveryError`] classifying why the send failed.
    async fn send_text(&self, chat_id: &str, text: &str) -> Result<(), DeliveryError>;

    /// Send an image with a caption.
    ///
    /// # Errors
    ///
    /// Returns a [`DeliveryError`] classifying why the send failed.
    async fn send_photo(
        &self,
        chat_id: &str,
        photo_url: &str,
        caption: &str,
    ) -> Result<(), DeliveryError>;
}
