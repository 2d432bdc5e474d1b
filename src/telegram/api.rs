//! Telegram Bot API client.
//!
//! Thin `reqwest` wrapper over the handful of Bot API methods the bot uses.
//! Implements [`Messenger`] so the core never depends on Telegram directly.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;

use super::format::split_message;
use super::poller::POLL_TIMEOUT_SECS;
use super::types::{BotCommand, File, TelegramResponse, Update, User};
use crate::channel::{Messenger, OutgoingReply};
use crate::error::ChannelError;
use crate::i18n::{self, Language};

/// Public Bot API endpoint.
pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Maximum message length for Telegram's sendMessage API.
const TELEGRAM_MAX_MESSAGE_LENGTH: usize = 4096;

/// Upper bound on any single Bot API request. Long polls hold the
/// connection for `POLL_TIMEOUT_SECS`, so this must stay above it.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(POLL_TIMEOUT_SECS + 30);

/// Telegram Bot API client.
#[derive(Clone)]
pub struct TelegramApi {
    bot_token: SecretString,
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl TelegramApi {
    pub fn new(bot_token: SecretString) -> Self {
        Self::with_base_url(bot_token, TELEGRAM_API_BASE)
    }

    /// Point the client at another Bot API server (local API server, tests).
    pub fn with_base_url(bot_token: SecretString, base_url: &str) -> Self {
        Self {
            bot_token,
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{method}",
            self.base_url,
            self.bot_token.expose_secret()
        )
    }

    fn file_url(&self, file_path: &str) -> String {
        format!(
            "{}/file/bot{}/{file_path}",
            self.base_url,
            self.bot_token.expose_secret()
        )
    }

    /// Call a Bot API method and unwrap the `{ok, result}` envelope.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: &serde_json::Value,
    ) -> Result<T, ChannelError> {
        let resp = self
            .client
            .post(self.api_url(method))
            .json(body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ChannelError::Http(format!("{method}: {}", redact(&e.to_string()))))?;

        let envelope: TelegramResponse<T> = resp.json().await.map_err(|e| {
            ChannelError::InvalidResponse(format!("{method}: {}", redact(&e.to_string())))
        })?;

        if !envelope.ok {
            return Err(ChannelError::InvalidResponse(format!(
                "{method} failed: {}",
                envelope.description.unwrap_or_else(|| "unknown error".into())
            )));
        }

        envelope
            .result
            .ok_or_else(|| ChannelError::InvalidResponse(format!("{method}: empty result")))
    }

    /// Identify the bot; used as the startup health check.
    pub async fn get_me(&self) -> Result<User, ChannelError> {
        self.call("getMe", &serde_json::json!({}))
            .await
            .map_err(|e| ChannelError::StartupFailed {
                name: "telegram".into(),
                reason: e.to_string(),
            })
    }

    /// Long-poll for new message updates.
    pub async fn get_updates(&self, offset: i64, timeout_secs: u64) -> Result<Vec<Update>, ChannelError> {
        self.call(
            "getUpdates",
            &serde_json::json!({
                "offset": offset,
                "timeout": timeout_secs,
                "allowed_updates": ["message"]
            }),
        )
        .await
    }

    /// Publish the command menu for one language (or the default menu).
    pub async fn set_my_commands(
        &self,
        commands: &[BotCommand],
        language_code: Option<&str>,
    ) -> Result<(), ChannelError> {
        let mut body = serde_json::json!({ "commands": commands });
        if let Some(code) = language_code {
            body["language_code"] = serde_json::Value::String(code.to_string());
        }
        let _: bool = self.call("setMyCommands", &body).await?;
        Ok(())
    }

    /// Publish the localized command menus from the message catalog.
    /// English doubles as the default menu for every other locale.
    pub async fn register_commands(&self) -> Result<(), ChannelError> {
        for lang in Language::ALL {
            let commands: Vec<BotCommand> = i18n::commands(lang)
                .iter()
                .map(|c| BotCommand {
                    command: c.name.to_string(),
                    description: c.description.to_string(),
                })
                .collect();
            let scope = (lang != Language::En).then(|| lang.code());
            self.set_my_commands(&commands, scope).await?;
        }
        Ok(())
    }

    /// Send a text message, splitting it at Telegram's 4096 char limit.
    pub async fn send_message(&self, chat_id: &str, reply: &OutgoingReply) -> Result<(), ChannelError> {
        for chunk in split_message(&reply.text, TELEGRAM_MAX_MESSAGE_LENGTH) {
            self.send_message_chunk(chat_id, &chunk, reply).await?;
        }
        Ok(())
    }

    /// Send a single chunk, formatted first with plain text fallback.
    async fn send_message_chunk(
        &self,
        chat_id: &str,
        text: &str,
        reply: &OutgoingReply,
    ) -> Result<(), ChannelError> {
        let mut body = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
            "disable_web_page_preview": !reply.link_preview,
        });

        let Some(parse_mode) = reply.format.parse_mode() else {
            return self.post_message(&body).await;
        };

        body["parse_mode"] = serde_json::Value::String(parse_mode.to_string());
        match self.post_message(&body).await {
            Ok(()) => Ok(()),
            Err(formatted_err) => {
                tracing::warn!(
                    parse_mode,
                    error = %formatted_err,
                    "Telegram sendMessage with formatting failed; retrying as plain text"
                );
                if let Some(obj) = body.as_object_mut() {
                    obj.remove("parse_mode");
                }
                self.post_message(&body).await
            }
        }
    }

    async fn post_message(&self, body: &serde_json::Value) -> Result<(), ChannelError> {
        let resp = self
            .client
            .post(self.api_url("sendMessage"))
            .json(body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ChannelError::SendFailed {
                name: "telegram".into(),
                reason: redact(&e.to_string()),
            })?;

        if resp.status().is_success() {
            return Ok(());
        }

        let status = resp.status();
        let err = resp.text().await.unwrap_or_default();
        Err(ChannelError::SendFailed {
            name: "telegram".into(),
            reason: format!("sendMessage returned {status}: {err}"),
        })
    }

    /// Resolve a file id and download its bytes.
    pub async fn download_file(&self, file_id: &str) -> Result<Vec<u8>, ChannelError> {
        let transfer_err = |reason: String| ChannelError::FileTransfer {
            file_id: file_id.to_string(),
            reason,
        };

        let file: File = self
            .call("getFile", &serde_json::json!({ "file_id": file_id }))
            .await
            .map_err(|e| transfer_err(e.to_string()))?;

        let path = file
            .file_path
            .ok_or_else(|| transfer_err("getFile returned no file_path".into()))?;

        let resp = self
            .client
            .get(self.file_url(&path))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| transfer_err(redact(&e.to_string())))?;

        if !resp.status().is_success() {
            return Err(transfer_err(format!("download returned {}", resp.status())));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| transfer_err(redact(&e.to_string())))?;

        tracing::debug!(file_id, size = bytes.len(), "Telegram file downloaded");
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl Messenger for TelegramApi {
    async fn send(&self, chat_id: &str, reply: &OutgoingReply) -> Result<(), ChannelError> {
        self.send_message(chat_id, reply).await
    }

    async fn download(&self, file_id: &str) -> Result<Vec<u8>, ChannelError> {
        self.download_file(file_id).await
    }
}

/// reqwest errors embed the request URL, which contains the bot token.
fn redact(message: &str) -> String {
    match message.find("/bot") {
        Some(start) => {
            let rest = &message[start + 4..];
            let end = rest.find('/').map(|i| start + 4 + i).unwrap_or(message.len());
            format!("{}/bot<redacted>{}", &message[..start], &message[end..])
        }
        None => message.to_string(),
    }
}

impl std::fmt::Debug for TelegramApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramApi")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
