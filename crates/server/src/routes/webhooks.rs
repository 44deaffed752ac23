//! Telegram webhook handler.
//!
//! The webhook always answers promptly with a generic acknowledgment:
//! Telegram only needs to know the update was received, and will retry
//! delivery if it sees an error status. Internal failures are logged and
//! flagged in the ack body, never surfaced as HTTP errors.

use axum::{
    Json, Router,
    extract::State,
    http::HeaderMap,
    routing::post,
};
use secrecy::ExposeSecret;
use serde::Serialize;
use tracing::{debug, error, instrument};

use dropcast_core::Platform;

use crate::error::AppError;
use crate::services::{Sender, SubscriptionService};
use crate::state::AppState;
use crate::telegram::{Update, parse_command};

/// Header Telegram echoes the configured webhook secret back in.
const SECRET_TOKEN_HEADER: &str = "X-Telegram-Bot-Api-Secret-Token";

/// Create Telegram webhook routes.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/webhooks/telegram", post(handle_telegram))
}

/// Acknowledgment body returned for every accepted webhook call.
#[derive(Debug, Serialize)]
struct WebhookAck {
    ok: bool,
}

/// Handle one inbound Telegram update.
///
/// Parsing failures and non-command chatter acknowledge `ok: true` with no
/// action; ledger or delivery failures acknowledge `ok: false` for log
/// correlation. Only a webhook-secret mismatch produces an HTTP error.
#[instrument(skip(state, headers, body))]
async fn handle_telegram(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<WebhookAck>, AppError> {
    if let Some(secret) = state.config().telegram.webhook_secret.as_ref() {
        let provided = headers
            .get(SECRET_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        if !constant_time_compare(provided, secret.expose_secret()) {
            return Err(AppError::Unauthorized(
                "invalid webhook secret token".to_string(),
            ));
        }
    }

    let update: Update = match serde_json::from_str(&body) {
        Ok(update) => update,
        Err(e) => {
            debug!(error = %e, "ignoring malformed update");
            return Ok(Json(WebhookAck { ok: true }));
        }
    };

    let Some(message) = update.message else {
        return Ok(Json(WebhookAck { ok: true }));
    };

    let command = parse_command(message.text.as_deref());
    let sender = Sender {
        chat_id: message.chat.id.to_string(),
        username: message.chat.username,
    };

    let service = SubscriptionService::new(
        state.ledger().clone(),
        state.telegram().clone(),
        Platform::Telegram,
    );

    let ok = match service.handle_command(command, &sender).await {
        Ok(()) => true,
        Err(e) => {
            error!(error = %e, chat_id = %sender.chat_id, "webhook handling failed");
            false
        }
    };

    Ok(Json(WebhookAck { ok }))
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }

    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_compare_equal() {
        assert!(constant_time_compare("hello", "hello"));
        assert!(constant_time_compare("", ""));
    }

    #[test]
    fn test_constant_time_compare_not_equal() {
        assert!(!constant_time_compare("hello", "world"));
        assert!(!constant_time_compare("hello", "hell"));
        assert!(!constant_time_compare("hello", "helloo"));
    }
}
