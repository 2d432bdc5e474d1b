//! Dispatch router: classifies each inbound message and sends it to the
//! conversation engine or a one-shot handler.

pub mod handlers;

pub use handlers::{HandlerError, Handlers};

use std::sync::Arc;

use tracing::debug;

use crate::backend::UploadKind;
use crate::channel::OutgoingReply;
use crate::conversation::{ConversationEngine, FlowInput, SenderProfile};
use crate::telegram::{Message, User};

/// An inbound message reduced to what routing needs.
#[derive(Debug, Clone)]
pub struct InboundEvent {
    pub chat_id: String,
    pub user: User,
    pub kind: EventKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// `/name arg...`; `name` is lowercased with any `@botname` removed.
    Command { name: String, args: Vec<String> },
    Text(String),
    /// Largest available size of a photo.
    Photo { file_id: String },
    Pdf { file_id: String, file_name: String },
    /// Voice note or audio file.
    Audio { file_id: String },
    Ignored,
}

/// Fallback name for PDFs sent without one.
const DEFAULT_PDF_NAME: &str = "statement.pdf";

impl InboundEvent {
    /// `None` for messages without a sender (channel posts).
    pub fn from_message(message: &Message) -> Option<Self> {
        let user = message.from.clone()?;
        Some(Self {
            chat_id: message.chat.id.to_string(),
            user,
            kind: EventKind::from_message(message),
        })
    }
}

impl EventKind {
    pub fn from_message(message: &Message) -> Self {
        if let Some(text) = message.text.as_deref() {
            return parse_text(text);
        }

        if let Some(photos) = message.photo.as_ref() {
            // Telegram lists sizes ascending; on ties prefer the later one.
            if let Some(best) = photos
                .iter()
                .max_by_key(|p| u64::from(p.width) * u64::from(p.height))
            {
                return Self::Photo {
                    file_id: best.file_id.clone(),
                };
            }
        }

        if let Some(doc) = message.document.as_ref() {
            if doc.mime_type.as_deref() == Some("application/pdf") {
                return Self::Pdf {
                    file_id: doc.file_id.clone(),
                    file_name: doc
                        .file_name
                        .clone()
                        .unwrap_or_else(|| DEFAULT_PDF_NAME.to_string()),
                };
            }
            return Self::Ignored;
        }

        if let Some(media) = message.voice.as_ref().or(message.audio.as_ref()) {
            return Self::Audio {
                file_id: media.file_id.clone(),
            };
        }

        Self::Ignored
    }
}

fn parse_text(text: &str) -> EventKind {
    let trimmed = text.trim();
    // A command name must follow the slash directly.
    let Some(rest) = trimmed
        .strip_prefix('/')
        .filter(|rest| rest.chars().next().is_some_and(|c| !c.is_whitespace()))
    else {
        return EventKind::Text(text.to_string());
    };

    let mut parts = rest.split_whitespace();
    let head = parts.next().unwrap_or("");
    let name = head.split('@').next().unwrap_or("").to_lowercase();
    if name.is_empty() {
        return EventKind::Text(text.to_string());
    }

    EventKind::Command {
        name,
        args: parts.map(str::to_string).collect(),
    }
}

/// Where an event goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    StartRegistration,
    StartSupport,
    /// Input for the active flow.
    Flow(FlowInput),
    OneShot(OneShot),
    Ignore,
}

/// Stateless request/response interactions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OneShot {
    Start(Vec<String>),
    Help,
    Balance,
    Reminders,
    Profile,
    Upgrade,
    Message(String),
    Upload {
        kind: UploadKind,
        file_id: String,
        file_name: String,
        mime: &'static str,
    },
}

/// Pure routing decision.
///
/// `/register` and `/support` always (re)start their flow. Flow commands
/// and free text go to the active flow when there is one. Every other
/// command and all media are handled one-shot, leaving flows untouched.
pub fn classify(kind: &EventKind, flow_active: bool) -> Route {
    match kind {
        EventKind::Command { name, args } => match name.as_str() {
            "register" => Route::StartRegistration,
            "support" => Route::StartSupport,
            "cancel" | "skip" | "confirm" if !flow_active => Route::Ignore,
            "cancel" => Route::Flow(FlowInput::Cancel),
            "skip" => Route::Flow(FlowInput::Skip),
            "confirm" => Route::Flow(FlowInput::Confirm),
            "start" => Route::OneShot(OneShot::Start(args.clone())),
            "help" => Route::OneShot(OneShot::Help),
            "balance" => Route::OneShot(OneShot::Balance),
            "reminders" => Route::OneShot(OneShot::Reminders),
            "profile" => Route::OneShot(OneShot::Profile),
            "upgrade" => Route::OneShot(OneShot::Upgrade),
            _ => Route::Ignore,
        },
        EventKind::Text(text) if flow_active => Route::Flow(FlowInput::Text(text.clone())),
        EventKind::Text(text) => Route::OneShot(OneShot::Message(text.clone())),
        EventKind::Photo { file_id } => Route::OneShot(OneShot::Upload {
            kind: UploadKind::Receipt,
            file_id: file_id.clone(),
            file_name: "receipt.jpg".into(),
            mime: "image/jpeg",
        }),
        EventKind::Pdf { file_id, file_name } => Route::OneShot(OneShot::Upload {
            kind: UploadKind::BankStatement,
            file_id: file_id.clone(),
            file_name: file_name.clone(),
            mime: "application/pdf",
        }),
        EventKind::Audio { file_id } => Route::OneShot(OneShot::Upload {
            kind: UploadKind::Audio,
            file_id: file_id.clone(),
            file_name: "audio.ogg".into(),
            mime: "audio/ogg",
        }),
        EventKind::Ignored => Route::Ignore,
    }
}

/// Routes events and renders every outcome into replies.
pub struct Dispatcher {
    engine: Arc<ConversationEngine>,
    handlers: Handlers,
}

impl Dispatcher {
    pub fn new(engine: Arc<ConversationEngine>, handlers: Handlers) -> Self {
        Self { engine, handlers }
    }

    pub async fn dispatch(&self, event: &InboundEvent) -> Vec<OutgoingReply> {
        let sender = SenderProfile::from(&event.user);
        let active = self.engine.active_flow(&sender).await;
        let route = classify(&event.kind, active.is_some());

        debug!(user_id = sender.user_id, ?active, ?route, "Routing event");

        match route {
            Route::StartRegistration => self.engine.start_registration(&sender).await,
            Route::StartSupport => self.engine.start_support(&sender).await,
            Route::Flow(input) => self.engine.feed(&sender, input).await.unwrap_or_default(),
            Route::OneShot(request) => {
                let reply = self
                    .handlers
                    .run(&event.user, request)
                    .await
                    .unwrap_or_else(|e| e.render(sender.language()));
                vec![reply]
            }
            Route::Ignore => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(raw: serde_json::Value) -> Message {
        serde_json::from_value(raw).unwrap()
    }

    fn command(name: &str, args: &[&str]) -> EventKind {
        EventKind::Command {
            name: name.into(),
            args: args.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn parses_commands() {
        assert_eq!(parse_text("/start payment_success"), command("start", &["payment_success"]));
        assert_eq!(parse_text("/Balance@OkanAssistBot"), command("balance", &[]));
        assert_eq!(parse_text("hello there"), EventKind::Text("hello there".into()));
        assert_eq!(parse_text("/"), EventKind::Text("/".into()));
    }

    #[test]
    fn slash_then_space_is_text() {
        assert_eq!(parse_text("/ hello"), EventKind::Text("/ hello".into()));
        assert_eq!(
            classify(&parse_text("/ hello"), true),
            Route::Flow(FlowInput::Text("/ hello".into()))
        );
        assert_eq!(
            classify(&parse_text("/\tcancel"), false),
            Route::OneShot(OneShot::Message("/\tcancel".into()))
        );
    }

    #[test]
    fn largest_photo_wins() {
        let msg = message(serde_json::json!({
            "message_id": 1,
            "chat": {"id": 5},
            "photo": [
                {"file_id": "s", "width": 90, "height": 60},
                {"file_id": "l", "width": 1280, "height": 853},
                {"file_id": "m", "width": 320, "height": 213}
            ]
        }));
        assert_eq!(EventKind::from_message(&msg), EventKind::Photo { file_id: "l".into() });
    }

    #[test]
    fn only_pdf_documents_are_handled() {
        let pdf = message(serde_json::json!({
            "message_id": 1, "chat": {"id": 5},
            "document": {"file_id": "d1", "file_name": "march.pdf", "mime_type": "application/pdf"}
        }));
        assert_eq!(
            EventKind::from_message(&pdf),
            EventKind::Pdf { file_id: "d1".into(), file_name: "march.pdf".into() }
        );

        let zip = message(serde_json::json!({
            "message_id": 2, "chat": {"id": 5},
            "document": {"file_id": "d2", "file_name": "x.zip", "mime_type": "application/zip"}
        }));
        assert_eq!(EventKind::from_message(&zip), EventKind::Ignored);
    }

    #[test]
    fn voice_and_audio() {
        let voice = message(serde_json::json!({
            "message_id": 1, "chat": {"id": 5},
            "voice": {"file_id": "v1", "mime_type": "audio/ogg"}
        }));
        assert_eq!(EventKind::from_message(&voice), EventKind::Audio { file_id: "v1".into() });

        let sticker = message(serde_json::json!({"message_id": 2, "chat": {"id": 5}, "sticker": {}}));
        assert_eq!(EventKind::from_message(&sticker), EventKind::Ignored);
    }

    #[test]
    fn event_requires_sender() {
        let msg = message(serde_json::json!({"message_id": 1, "chat": {"id": 5}, "text": "hi"}));
        assert!(InboundEvent::from_message(&msg).is_none());
    }

    #[test]
    fn flow_commands_need_active_flow() {
        for (name, input) in [
            ("cancel", FlowInput::Cancel),
            ("skip", FlowInput::Skip),
            ("confirm", FlowInput::Confirm),
        ] {
            assert_eq!(classify(&command(name, &[]), false), Route::Ignore);
            assert_eq!(classify(&command(name, &[]), true), Route::Flow(input));
        }
    }

    #[test]
    fn entry_commands_always_restart() {
        for active in [false, true] {
            assert_eq!(classify(&command("register", &[]), active), Route::StartRegistration);
            assert_eq!(classify(&command("support", &[]), active), Route::StartSupport);
        }
    }

    #[test]
    fn text_goes_to_flow_or_backend() {
        let text = EventKind::Text("bob@test.com".into());
        assert_eq!(
            classify(&text, true),
            Route::Flow(FlowInput::Text("bob@test.com".into()))
        );
        assert_eq!(
            classify(&text, false),
            Route::OneShot(OneShot::Message("bob@test.com".into()))
        );
    }

    #[test]
    fn one_shot_commands_ignore_flow_state() {
        for active in [false, true] {
            assert_eq!(classify(&command("balance", &[]), active), Route::OneShot(OneShot::Balance));
            assert_eq!(classify(&command("help", &[]), active), Route::OneShot(OneShot::Help));
        }
        assert_eq!(
            classify(&command("start", &["portal_return"]), false),
            Route::OneShot(OneShot::Start(vec!["portal_return".into()]))
        );
        assert_eq!(classify(&command("unknown", &[]), false), Route::Ignore);
    }

    #[test]
    fn media_routes_to_uploads() {
        let route = classify(&EventKind::Photo { file_id: "p".into() }, true);
        assert_eq!(
            route,
            Route::OneShot(OneShot::Upload {
                kind: UploadKind::Receipt,
                file_id: "p".into(),
                file_name: "receipt.jpg".into(),
                mime: "image/jpeg",
            })
        );
        match classify(&EventKind::Audio { file_id: "a".into() }, false) {
            Route::OneShot(OneShot::Upload { kind, file_name, mime, .. }) => {
                assert_eq!(kind, UploadKind::Audio);
                assert_eq!(file_name, "audio.ogg");
                assert_eq!(mime, "audio/ogg");
            }
            other => panic!("unexpected route {other:?}"),
        }
    }
}
