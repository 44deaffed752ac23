//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DROPCAST_DATABASE_URL` - `PostgreSQL` connection string
//! - `TELEGRAM_BOT_TOKEN` - Bot API token used for all outbound messages
//!
//! ## Optional
//! - `DROPCAST_HOST` - Bind address (default: 127.0.0.1)
//! - `DROPCAST_PORT` - Listen port (default: 3000)
//! - `TELEGRAM_WEBHOOK_SECRET` - Secret token Telegram echoes back in the
//!   `X-Telegram-Bot-Api-Secret-Token` header; verified when set
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Telegram bot configuration
    pub telegram: TelegramConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Telegram bot configuration.
///
/// `SecretString` fields redact themselves in `Debug` output.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Bot API token
    pub bot_token: SecretString,
    /// Webhook secret token; header verification is skipped when unset
    pub webhook_secret: Option<SecretString>,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid,
    /// or if the bot token looks like an unreplaced placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_required_secret("DROPCAST_DATABASE_URL")?;
        let host = get_env_or_default("DROPCAST_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("DROPCAST_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("DROPCAST_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("DROPCAST_PORT".to_string(), e.to_string()))?;

        let telegram = TelegramConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            database_url,
            host,
            port,
            telegram,
            sentry_dsn,
        })
    }

    /// The socket address to bind the listener to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl TelegramConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let bot_token = get_validated_secret("TELEGRAM_BOT_TOKEN")?;
        let webhook_secret = get_optional_env("TELEGRAM_WEBHOOK_SECRET").map(SecretString::from);

        Ok(Self {
            bot_token,
            webhook_secret,
        })
    }
}

/// Get a required environment variable as a secret.
fn get_required_secret(name: &str) -> Result<SecretString, ConfigError> {
    std::env::var(name)
        .map(SecretString::from)
        .map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

/// Get a required secret and reject obvious placeholder values.
fn get_validated_secret(name: &str) -> Result<SecretString, ConfigError> {
    let secret = get_required_secret(name)?;

    if secret.expose_secret().is_empty() {
        return Err(ConfigError::InvalidEnvVar(
            name.to_string(),
            "must not be empty".to_string(),
        ));
    }

    if let Some(pattern) = find_placeholder(secret.expose_secret()) {
        return Err(ConfigError::InsecureSecret(
            name.to_string(),
            format!("contains placeholder pattern '{pattern}'"),
        ));
    }

    Ok(secret)
}

/// Get an environment variable with a default value.
fn get_env_or_default(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Check a secret value against the placeholder blocklist.
fn find_placeholder(value: &str) -> Option<&'static str> {
    let lowered = value.to_lowercase();
    PLACEHOLDER_PATTERNS
        .iter()
        .find(|pattern| lowered.contains(**pattern))
        .copied()
}
