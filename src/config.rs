//! Configuration types.
//!
//! Everything comes from the environment; there are no command-line flags.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::{self, ConfigError};

/// Default base URL of the financial-assistant API.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Path prefix every backend endpoint lives under.
pub const DEFAULT_API_PREFIX: &str = "/okanassist/v1";

/// Bot configuration.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Telegram bot credential.
    pub bot_token: SecretString,
    /// Backend base URL, without the path prefix.
    pub api_url: String,
    /// Path prefix for backend endpoints.
    pub api_prefix: String,
    /// Chat that support requests are forwarded to. Support is unavailable when unset.
    pub support_chat_id: Option<String>,
    /// Public web app URL shown on the profile page.
    pub app_url: Option<String>,
    /// Port for the liveness endpoint.
    pub port: u16,
    /// Conversations untouched for this long are evicted.
    pub session_idle_timeout: Duration,
    /// Per-request timeout for backend calls.
    pub backend_timeout: Duration,
}

impl BotConfig {
    /// Load configuration from process environment variables.
    pub fn from_env() -> error::Result<Self> {
        Ok(Self::from_lookup(|key| std::env::var(key).ok())?)
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bot_token = get("TELEGRAM_BOT_TOKEN")
            .ok_or_else(|| ConfigError::MissingEnvVar("TELEGRAM_BOT_TOKEN".to_string()))?;

        let api_url = get("API_SERVICE_URL")
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let api_prefix = get("API_PATH_PREFIX").unwrap_or_else(|| DEFAULT_API_PREFIX.to_string());
        let api_prefix = format!("/{}", api_prefix.trim_matches('/'));

        let port = parse_or(get("PORT"), "PORT", 8080u16)?;
        let idle_secs = parse_or(get("SESSION_IDLE_TIMEOUT_SECS"), "SESSION_IDLE_TIMEOUT_SECS", 3600u64)?;
        let timeout_secs = parse_or(get("BACKEND_TIMEOUT_SECS"), "BACKEND_TIMEOUT_SECS", 60u64)?;

        Ok(Self {
            bot_token: SecretString::from(bot_token),
            api_url,
            api_prefix,
            support_chat_id: get("SUPPORT_CHAT_ID"),
            app_url: get("APP_URL"),
            port,
            session_idle_timeout: Duration::from_secs(idle_secs),
            backend_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Full backend base including the path prefix, e.g. `http://host/okanassist/v1`.
    pub fn backend_base(&self) -> String {
        format!("{}{}", self.api_url, self.api_prefix)
    }
}

fn parse_or<T: std::str::FromStr>(
    raw: Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(v) => v.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("{v:?}: {e}"),
        }),
    }
}
