//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ServerConfig;
use crate::db::PgLedger;
use crate::telegram::TelegramClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// ledger and notifier collaborators. Handlers receive everything through
/// here; there are no process-wide singletons.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    ledger: PgLedger,
    telegram: TelegramClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Server configuration
    /// * `pool` - `PostgreSQL` connection pool
    #[must_use]
    pub fn new(config: ServerConfig, pool: PgPool) -> Self {
        let telegram = TelegramClient::new(config.telegram.bot_token.clone());
        let ledger = PgLedger::new(pool);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                ledger,
                telegram,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        self.inner.ledger.pool()
    }

    /// Get a reference to the subscription ledger.
    #[must_use]
    pub fn ledger(&self) -> &PgLedger {
        &self.inner.ledger
    }

    /// Get a reference to the Telegram Bot API client.
    #[must_use]
    pub fn telegram(&self) -> &TelegramClient {
        &self.inner.telegram
    }
}
