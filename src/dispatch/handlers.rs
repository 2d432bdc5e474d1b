//! One-shot handlers: a single backend call (or none) per message.

use std::sync::Arc;

use tracing::{info, warn};

use super::OneShot;
use crate::backend::{
    BackendGateway, MessageResponse, RouteMessageRequest, StartRequest, Upload, UploadKind,
};
use crate::channel::{Messenger, OutgoingReply};
use crate::error::{BackendError, ChannelError};
use crate::i18n::{self, Feature, Language, MessageKey};
use crate::telegram::User;
use crate::telegram::format::escape_markdown_v2;

/// Window for `/balance`.
pub const SUMMARY_DAYS: u32 = 30;
/// Page size for `/reminders`.
pub const REMINDER_LIMIT: u32 = 10;

/// Why a one-shot handler could not produce its normal reply.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// The backend does not know this user.
    #[error("user is not registered (needed to {feature:?})")]
    Unregistered {
        feature: Feature,
        /// Backend explanation, shown instead of the register hint.
        detail: Option<String>,
    },

    #[error("backend unavailable: {0}")]
    Unavailable(#[source] BackendError),

    #[error("handler failed: {0}")]
    Failed(String),

    #[error("file transfer failed: {0}")]
    Transfer(#[from] ChannelError),

    /// The backend refused with its own message for the user.
    #[error("backend refused: {0}")]
    Rejected(String),
}

impl HandlerError {
    /// Map a gateway error; 401 becomes "please register".
    fn from_backend(err: BackendError, feature: Feature) -> Self {
        match err {
            BackendError::Unauthorized { .. } => Self::Unregistered {
                feature,
                detail: None,
            },
            other => Self::Unavailable(other),
        }
    }

    /// User-facing rendering.
    pub fn render(&self, lang: Language) -> OutgoingReply {
        let msg = |key| i18n::message(lang, key, &[]);
        match self {
            Self::Unregistered { feature, detail } => {
                let hint = match detail {
                    Some(detail) => format!("⚠️ {detail}"),
                    None => i18n::message(
                        lang,
                        MessageKey::RegisterFirst,
                        &[("feature", feature.phrase(lang))],
                    ),
                };
                OutgoingReply::markdown(format!("{}\n{hint}", msg(MessageKey::UserNotFound)))
            }
            Self::Unavailable(_) => OutgoingReply::plain(msg(MessageKey::GenericDowntime)),
            Self::Failed(_) | Self::Transfer(_) => OutgoingReply::plain(msg(MessageKey::GenericError)),
            Self::Rejected(message) => OutgoingReply::plain(message.clone()),
        }
    }
}

/// Backend `message` as a Markdown reply; a missing one counts as malformed.
fn relay(resp: MessageResponse) -> Result<OutgoingReply, HandlerError> {
    resp.message.map(OutgoingReply::markdown).ok_or_else(|| {
        HandlerError::Unavailable(BackendError::Decode("response carried no message".into()))
    })
}

/// Shared dependencies of the one-shot handlers.
pub struct Handlers {
    backend: Arc<dyn BackendGateway>,
    messenger: Arc<dyn Messenger>,
    app_url: Option<String>,
}

impl Handlers {
    pub fn new(
        backend: Arc<dyn BackendGateway>,
        messenger: Arc<dyn Messenger>,
        app_url: Option<String>,
    ) -> Self {
        Self {
            backend,
            messenger,
            app_url,
        }
    }

    pub async fn run(&self, user: &User, request: OneShot) -> Result<OutgoingReply, HandlerError> {
        let lang = Language::from_code(user.language_code.as_deref());
        let telegram_id = user.id.to_string();

        let result = match request {
            OneShot::Start(args) => self.start(user, args, lang).await,
            OneShot::Help => Ok(OutgoingReply::markdown(i18n::message(
                lang,
                MessageKey::HelpMessage,
                &[],
            ))),
            OneShot::Balance => self
                .backend
                .transaction_summary(&telegram_id, SUMMARY_DAYS)
                .await
                .map_err(|e| HandlerError::from_backend(e, Feature::Balance))
                .and_then(relay),
            OneShot::Reminders => self
                .backend
                .reminders(&telegram_id, REMINDER_LIMIT)
                .await
                .map_err(|e| HandlerError::from_backend(e, Feature::Reminders))
                .and_then(relay),
            OneShot::Profile => self.profile(&telegram_id, lang).await,
            OneShot::Upgrade => self.upgrade(&telegram_id).await,
            OneShot::Message(text) => self.route_message(user, text).await,
            OneShot::Upload {
                kind,
                file_id,
                file_name,
                mime,
            } => {
                self.upload(&telegram_id, kind, &file_id, file_name, mime, lang)
                    .await
            }
        };

        if let Err(e) = &result {
            warn!(user_id = user.id, error = %e, "One-shot handler failed");
        }
        result
    }

    async fn start(
        &self,
        user: &User,
        args: Vec<String>,
        lang: Language,
    ) -> Result<OutgoingReply, HandlerError> {
        let local = match args.first().map(String::as_str) {
            Some("payment_success") => Some(MessageKey::PaymentSuccess),
            Some("payment_cancelled") => Some(MessageKey::PaymentFailure),
            Some("portal_return") => Some(MessageKey::PortalReturn),
            _ => None,
        };
        if let Some(key) = local {
            return Ok(OutgoingReply::markdown(i18n::message(lang, key, &[])));
        }

        if let Some(arg) = args.first() {
            info!(user_id = user.id, arg = %arg, "/start with deep-link argument");
        }

        let request = StartRequest {
            telegram_id: user.id.to_string(),
            user_data: user_data(user),
            args,
            language_code: user.language_code.clone(),
        };

        match self.backend.start(&request).await {
            Ok(resp) => resp
                .message
                .map(|m| OutgoingReply::markdown(m).with_link_preview(false))
                .ok_or_else(|| HandlerError::Failed("/start response carried no message".into())),
            Err(BackendError::Unauthorized { .. }) => Err(HandlerError::Unregistered {
                feature: Feature::Messages,
                detail: None,
            }),
            Err(e) => Err(HandlerError::Failed(e.to_string())),
        }
    }

    async fn profile(&self, telegram_id: &str, lang: Language) -> Result<OutgoingReply, HandlerError> {
        let resp = match self.backend.profile(telegram_id).await {
            Ok(resp) => resp,
            Err(BackendError::Unauthorized { .. }) => {
                return Err(HandlerError::Unregistered {
                    feature: Feature::Profile,
                    detail: None,
                });
            }
            Err(e) => return Err(HandlerError::Failed(e.to_string())),
        };

        let data = &resp.user_data;
        let field = |value: &Option<String>, default: &str| {
            escape_markdown_v2(value.as_deref().unwrap_or(default))
        };
        let webapp_url = escape_markdown_v2(self.app_url.as_deref().unwrap_or("N/A"));
        let premium = if data.is_premium { "Yes" } else { "No" };

        let mut text = i18n::message(
            lang,
            MessageKey::ProfileInfo,
            &[
                ("email", field(&data.email, "Not set").as_str()),
                ("name", field(&data.name, "Unknown").as_str()),
                ("language", field(&data.language, "en").as_str()),
                ("currency", field(&data.currency, "USD").as_str()),
                ("timezone", field(&data.timezone, "UTC").as_str()),
                ("webapp_url", webapp_url.as_str()),
                ("premium_status", premium),
            ],
        );

        if data.is_premium {
            let portal = resp
                .manage_url
                .as_ref()
                .and_then(|m| m.portal_url.as_deref())
                .unwrap_or("");
            text.push_str(&i18n::message(
                lang,
                MessageKey::ManageUrl,
                &[("url", escape_markdown_v2(portal).as_str())],
            ));
            text.push_str("\n\n");
        }

        Ok(OutgoingReply::markdown_v2(text))
    }

    async fn upgrade(&self, telegram_id: &str) -> Result<OutgoingReply, HandlerError> {
        match self.backend.upgrade(telegram_id).await {
            Ok(resp) if resp.success => resp
                .message
                .map(|m| OutgoingReply::markdown(m).with_link_preview(true))
                .ok_or_else(|| HandlerError::Failed("upgrade response carried no message".into())),
            Ok(resp) => Err(resp
                .message
                .map(HandlerError::Rejected)
                .unwrap_or_else(|| HandlerError::Failed("upgrade refused without a message".into()))),
            Err(BackendError::Status {
                message: Some(message),
                ..
            }) => Err(HandlerError::Rejected(message)),
            Err(BackendError::Status { status, message: None }) => {
                Err(HandlerError::Failed(format!("upgrade returned HTTP {status}")))
            }
            Err(e) => Err(HandlerError::from_backend(e, Feature::Upgrade)),
        }
    }

    async fn route_message(&self, user: &User, text: String) -> Result<OutgoingReply, HandlerError> {
        let request = RouteMessageRequest {
            telegram_id: user.id.to_string(),
            message: text,
            user_data: user_data(user),
            language_code: user.language_code.clone(),
        };

        match self.backend.route_message(&request).await {
            Ok(resp) => relay(resp),
            Err(BackendError::Unauthorized { detail }) => Err(HandlerError::Unregistered {
                feature: Feature::Messages,
                detail,
            }),
            Err(e) => Err(HandlerError::Unavailable(e)),
        }
    }

    async fn upload(
        &self,
        telegram_id: &str,
        kind: UploadKind,
        file_id: &str,
        file_name: String,
        mime: &str,
        lang: Language,
    ) -> Result<OutgoingReply, HandlerError> {
        let bytes = self.messenger.download(file_id).await?;

        info!(telegram_id, path = kind.path(), size = bytes.len(), "Forwarding upload");

        let upload = Upload {
            bytes,
            file_name,
            mime: mime.to_string(),
        };
        let feature = match kind {
            UploadKind::Receipt => Feature::Receipts,
            UploadKind::BankStatement => Feature::Documents,
            UploadKind::Audio => Feature::Audio,
        };

        let resp = self
            .backend
            .upload(kind, telegram_id, upload)
            .await
            .map_err(|e| HandlerError::from_backend(e, feature))?;

        match (kind, resp.message) {
            (_, Some(message)) => Ok(OutgoingReply::markdown(message)),
            (UploadKind::Audio, None) => Ok(OutgoingReply::markdown(i18n::message(
                lang,
                MessageKey::AudioProcessed,
                &[],
            ))),
            (_, None) => relay(MessageResponse { message: None }),
        }
    }
}

/// The Telegram user object as the backend expects it.
fn user_data(user: &User) -> serde_json::Value {
    serde_json::to_value(user).unwrap_or_default()
}
