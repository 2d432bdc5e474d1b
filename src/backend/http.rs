//! `reqwest` implementation of the backend gateway.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;

use super::{
    BackendGateway, MessageResponse, OutcomeResponse, ProfileResponse, RegistrationRequest,
    RouteMessageRequest, StartRequest, Upload, UploadKind,
};
use crate::config::BotConfig;
use crate::error::BackendError;

/// HTTP client for the backend API.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(config: &BotConfig) -> Result<Self, BackendError> {
        Self::with_base_url(&config.backend_base(), config.backend_timeout)
    }

    /// `base_url` includes the path prefix, e.g. `http://host/okanassist/v1`.
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, BackendError>
    where
        B: serde::Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let resp = self.client.post(self.url(path)).json(body).send().await?;
        decode(path, resp).await
    }

    async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, BackendError> {
        let resp = self.client.get(self.url(path)).query(query).send().await?;
        decode(path, resp).await
    }
}

/// Map the HTTP status, then parse the JSON body.
async fn decode<T: DeserializeOwned>(path: &str, resp: reqwest::Response) -> Result<T, BackendError> {
    let status = resp.status();

    if status.is_success() {
        return resp.json::<T>().await.map_err(|e| {
            tracing::warn!(path, error = %e, "Malformed backend response");
            BackendError::Decode(format!("{path}: {e}"))
        });
    }

    // Error bodies are best-effort JSON carrying `message` or `detail`.
    let body: serde_json::Value = resp.json().await.unwrap_or_default();
    let field = |name: &str| body.get(name).and_then(|v| v.as_str()).map(str::to_string);

    tracing::warn!(path, status = status.as_u16(), "Backend returned an error status");

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(BackendError::Unauthorized {
            detail: field("detail").or_else(|| field("message")),
        });
    }

    Err(BackendError::Status {
        status: status.as_u16(),
        message: field("message").or_else(|| field("detail")),
    })
}

#[async_trait]
impl BackendGateway for HttpBackend {
    async fn register(&self, request: &RegistrationRequest) -> Result<OutcomeResponse, BackendError> {
        self.post_json("/register", request).await
    }

    async fn start(&self, request: &StartRequest) -> Result<MessageResponse, BackendError> {
        self.post_json("/start", request).await
    }

    async fn upgrade(&self, telegram_id: &str) -> Result<OutcomeResponse, BackendError> {
        self.post_json("/upgrade", &serde_json::json!({ "telegram_id": telegram_id }))
            .await
    }

    async fn route_message(&self, request: &RouteMessageRequest) -> Result<MessageResponse, BackendError> {
        self.post_json("/route-message", request).await
    }

    async fn transaction_summary(&self, telegram_id: &str, days: u32) -> Result<MessageResponse, BackendError> {
        self.get_query(
            "/get-transaction-summary",
            &[("telegram_id", telegram_id.to_string()), ("days", days.to_string())],
        )
        .await
    }

    async fn reminders(&self, telegram_id: &str, limit: u32) -> Result<MessageResponse, BackendError> {
        self.get_query(
            "/get-reminders",
            &[("telegram_id", telegram_id.to_string()), ("limit", limit.to_string())],
        )
        .await
    }

    async fn profile(&self, telegram_id: &str) -> Result<ProfileResponse, BackendError> {
        self.get_query("/profile", &[("telegram_id", telegram_id.to_string())])
            .await
    }

    async fn upload(
        &self,
        kind: UploadKind,
        telegram_id: &str,
        upload: Upload,
    ) -> Result<MessageResponse, BackendError> {
        let size = upload.bytes.len();
        let file = Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&upload.mime)?;
        let form = Form::new()
            .text("telegram_id", telegram_id.to_string())
            .part("file", file);

        tracing::debug!(path = kind.path(), size, "Uploading file to backend");

        let resp = self
            .client
            .post(self.url(kind.path()))
            .multipart(form)
            .send()
            .await?;
        decode(kind.path(), resp).await
    }
}
