//! Error types for the OkanAssist bot.

/// Top-level error type for the bot process.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Telegram transport errors.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("Channel {name} failed to start: {reason}")]
    StartupFailed { name: String, reason: String },

    #[error("Failed to send message on channel {name}: {reason}")]
    SendFailed { name: String, reason: String },

    #[error("File transfer failed for {file_id}: {reason}")]
    FileTransfer { file_id: String, reason: String },

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    #[error("HTTP error: {0}")]
    Http(String),
}

/// Errors returned by the financial-assistant API gateway.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BackendError {
    /// The backend answered 401: the user has no account yet.
    #[error("Unauthenticated: {}", detail.as_deref().unwrap_or("no detail"))]
    Unauthorized { detail: Option<String> },

    /// Any other non-2xx answer. `message` carries the backend's own
    /// explanation when the body had one.
    #[error("Backend returned HTTP {status}")]
    Status { status: u16, message: Option<String> },

    #[error("Backend request failed: {0}")]
    Transport(String),

    #[error("Malformed backend response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

/// Result type alias for the bot.
pub type Result<T> = std::result::Result<T, Error>;
