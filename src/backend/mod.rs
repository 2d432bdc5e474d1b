//! Gateway to the OkanAssist financial-assistant API.
//!
//! [`BackendGateway`] is the seam the dispatcher and conversation engine use;
//! [`HttpBackend`] is the production implementation.

pub mod http;

pub use http::HttpBackend;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::BackendError;

/// Body of `POST /register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub telegram_id: String,
    pub email: String,
    pub name: String,
    pub language_code: String,
    pub timezone: String,
    pub currency: String,
}

/// Body of `POST /start`.
#[derive(Debug, Clone, Serialize)]
pub struct StartRequest {
    pub telegram_id: String,
    /// The Telegram user object, passed through verbatim.
    pub user_data: serde_json::Value,
    pub args: Vec<String>,
    pub language_code: Option<String>,
}

/// Body of `POST /route-message`.
#[derive(Debug, Clone, Serialize)]
pub struct RouteMessageRequest {
    pub telegram_id: String,
    pub message: String,
    pub user_data: serde_json::Value,
    pub language_code: Option<String>,
}

/// `{success, message}` answers (`/register`, `/upgrade`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OutcomeResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// `{message}` answers from most endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Answer of `GET /profile`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileResponse {
    #[serde(default)]
    pub user_data: ProfileData,
    #[serde(default)]
    pub manage_url: Option<ManageUrl>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileData {
    pub email: Option<String>,
    pub name: Option<String>,
    pub language: Option<String>,
    pub currency: Option<String>,
    pub timezone: Option<String>,
    #[serde(default)]
    pub is_premium: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManageUrl {
    #[serde(default)]
    pub portal_url: Option<String>,
}

/// Which upload endpoint a file goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Receipt,
    BankStatement,
    Audio,
}

impl UploadKind {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Receipt => "/process-receipt",
            Self::BankStatement => "/process-bank-statement",
            Self::Audio => "/process-audio",
        }
    }
}

/// A file to upload as the multipart `file` field.
#[derive(Debug, Clone)]
pub struct Upload {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime: String,
}

/// Operations the bot needs from the backend.
///
/// Every method maps 401 to [`BackendError::Unauthorized`] and other
/// non-2xx answers to [`BackendError::Status`].
#[async_trait]
pub trait BackendGateway: Send + Sync {
    async fn register(&self, request: &RegistrationRequest) -> Result<OutcomeResponse, BackendError>;

    async fn start(&self, request: &StartRequest) -> Result<MessageResponse, BackendError>;

    async fn upgrade(&self, telegram_id: &str) -> Result<OutcomeResponse, BackendError>;

    async fn route_message(&self, request: &RouteMessageRequest) -> Result<MessageResponse, BackendError>;

    async fn transaction_summary(&self, telegram_id: &str, days: u32) -> Result<MessageResponse, BackendError>;

    async fn reminders(&self, telegram_id: &str, limit: u32) -> Result<MessageResponse, BackendError>;

    async fn profile(&self, telegram_id: &str) -> Result<ProfileResponse, BackendError>;

    async fn upload(
        &self,
        kind: UploadKind,
        telegram_id: &str,
        upload: Upload,
    ) -> Result<MessageResponse, BackendError>;
}
