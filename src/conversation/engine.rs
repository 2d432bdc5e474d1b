//! Runs the dialogue state machines against the session store and carries
//! out their effects.

use std::sync::Arc;

use tracing::{info, warn};

use super::{
    Effect, FlowInput, Prompt, RegistrationState, SenderProfile, SupportReport, SupportState,
    Transition,
};
use crate::backend::{BackendGateway, RegistrationRequest};
use crate::channel::{Messenger, OutgoingReply};
use crate::error::BackendError;
use crate::i18n::{self, Language, MessageKey};
use crate::session::{FlowKind, FlowState, SessionStore};
use crate::telegram::format::escape_markdown;

/// Executor for registration and support dialogues.
pub struct ConversationEngine {
    sessions: Arc<dyn SessionStore>,
    backend: Arc<dyn BackendGateway>,
    messenger: Arc<dyn Messenger>,
    operator_chat: Option<String>,
}

impl ConversationEngine {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        backend: Arc<dyn BackendGateway>,
        messenger: Arc<dyn Messenger>,
        operator_chat: Option<String>,
    ) -> Self {
        Self {
            sessions,
            backend,
            messenger,
            operator_chat,
        }
    }

    /// `/register`: start (or restart) the registration dialogue.
    pub async fn start_registration(&self, sender: &SenderProfile) -> Vec<OutgoingReply> {
        info!(user_id = sender.user_id, "Registration started");
        let t = RegistrationState::start(sender).map(FlowState::Registration);
        self.apply(sender, FlowKind::Registration, t, true).await
    }

    /// `/support`: start (or restart) the support dialogue.
    pub async fn start_support(&self, sender: &SenderProfile) -> Vec<OutgoingReply> {
        info!(user_id = sender.user_id, "Support dialogue started");
        let t = SupportState::start().map(FlowState::Support);
        self.apply(sender, FlowKind::Support, t, true).await
    }

    /// The flow that would receive input from this user right now.
    pub async fn active_flow(&self, sender: &SenderProfile) -> Option<FlowKind> {
        self.sessions.active(&sender.key()).await.into_iter().next()
    }

    /// Feed an input to the user's most recently started flow.
    ///
    /// Returns `None` when no flow is active.
    pub async fn feed(&self, sender: &SenderProfile, input: FlowInput) -> Option<Vec<OutgoingReply>> {
        let user_id = sender.key();
        let kind = self.active_flow(sender).await?;
        let state = self.sessions.get(&user_id, kind).await?;

        let t = match state {
            FlowState::Registration(s) => s.on_input(input).map(FlowState::Registration),
            FlowState::Support(s) => s.on_input(input, sender).map(FlowState::Support),
        };
        Some(self.apply(sender, kind, t, false).await)
    }

    /// Persist the next state first, then run the effects.
    async fn apply(
        &self,
        sender: &SenderProfile,
        kind: FlowKind,
        t: Transition<FlowState>,
        restart: bool,
    ) -> Vec<OutgoingReply> {
        let user_id = sender.key();
        match t.next {
            Some(state) => self.sessions.put(&user_id, state, restart).await,
            None => {
                self.sessions.delete(&user_id, kind).await;
            }
        }

        let lang = sender.language();
        let mut replies = Vec::with_capacity(t.effects.len());
        for effect in t.effects {
            let reply = match effect {
                Effect::Say(prompt) => render_prompt(lang, &prompt),
                Effect::Submit(request) => self.submit(lang, &request).await,
                Effect::Forward(report) => self.forward(lang, &report).await,
            };
            replies.push(reply);
        }
        replies
    }

    async fn submit(&self, lang: Language, request: &RegistrationRequest) -> OutgoingReply {
        let failed = |reason: Option<String>| {
            let unknown = i18n::message(lang, MessageKey::UnknownError, &[]);
            let reason = reason.unwrap_or(unknown);
            OutgoingReply::plain(i18n::message(
                lang,
                MessageKey::RegistrationFailed,
                &[("reason", reason.as_str())],
            ))
        };

        match self.backend.register(request).await {
            Ok(resp) if resp.success => {
                info!(telegram_id = %request.telegram_id, "Registration accepted");
                match resp.message {
                    Some(message) => OutgoingReply::markdown(message),
                    None => {
                        warn!(telegram_id = %request.telegram_id, "Registration succeeded without a message");
                        OutgoingReply::plain(i18n::message(lang, MessageKey::RegistrationError, &[]))
                    }
                }
            }
            Ok(resp) => {
                info!(telegram_id = %request.telegram_id, "Registration rejected");
                failed(resp.message)
            }
            Err(BackendError::Status { status, message }) => {
                warn!(telegram_id = %request.telegram_id, status, "Registration refused");
                failed(message)
            }
            Err(BackendError::Unauthorized { detail }) => failed(detail),
            Err(e) => {
                warn!(telegram_id = %request.telegram_id, error = %e, "Registration submission failed");
                OutgoingReply::plain(i18n::message(lang, MessageKey::RegistrationError, &[]))
            }
        }
    }

    async fn forward(&self, lang: Language, report: &SupportReport) -> OutgoingReply {
        let Some(chat) = self.operator_chat.as_deref() else {
            warn!("Support chat not configured; cannot forward ticket");
            return OutgoingReply::plain(i18n::message(lang, MessageKey::SupportUnavailable, &[]));
        };

        match self
            .messenger
            .send(chat, &OutgoingReply::markdown(report.render()))
            .await
        {
            Ok(()) => {
                info!(user_id = report.user_id, "Support ticket forwarded");
                OutgoingReply::markdown(i18n::message(lang, MessageKey::SupportMessage, &[]))
            }
            Err(e) => {
                warn!(user_id = report.user_id, error = %e, "Failed to forward support ticket");
                OutgoingReply::plain(i18n::message(lang, MessageKey::GenericError, &[]))
            }
        }
    }
}

/// Render a flow prompt in the user's language.
pub fn render_prompt(lang: Language, prompt: &Prompt) -> OutgoingReply {
    let msg = |key| i18n::message(lang, key, &[]);
    match prompt {
        Prompt::RegisterStart => OutgoingReply::markdown(msg(MessageKey::RegisterStart)),
        Prompt::InvalidEmail => OutgoingReply::plain(msg(MessageKey::ValidateEmail)),
        Prompt::AskFirstName {
            email,
            default_first_name,
        } => OutgoingReply::markdown(i18n::message(
            lang,
            MessageKey::RegisterFirstName,
            &[
                ("email", escape_markdown(email).as_str()),
                ("first_name", escape_markdown(default_first_name).as_str()),
            ],
        )),
        Prompt::AskLastName => OutgoingReply::markdown(msg(MessageKey::RegisterLastName)),
        Prompt::AskTimezone => OutgoingReply::markdown(msg(MessageKey::RegisterTimezone)),
        Prompt::Confirm {
            email,
            first_name,
            last_name,
            language_code,
            timezone,
        } => {
            let mut text = i18n::message(
                lang,
                MessageKey::RegisterConfirmation,
                &[
                    ("email", escape_markdown(email).as_str()),
                    ("first_name", escape_markdown(first_name).as_str()),
                ],
            );
            if let Some(last) = last_name {
                text.push(' ');
                text.push_str(&escape_markdown(last));
            }
            text.push_str(&i18n::message(
                lang,
                MessageKey::RegisterConfirmationWithTimezone,
                &[
                    ("language", escape_markdown(language_code).as_str()),
                    ("timezone", escape_markdown(timezone).as_str()),
                ],
            ));
            OutgoingReply::markdown(text)
        }
        Prompt::ConfirmReminder => OutgoingReply::plain(msg(MessageKey::InvalidConfirmation)),
        Prompt::RegisterCancelled => OutgoingReply::markdown(msg(MessageKey::RegisterCancelled)),
        Prompt::SupportPrompt => OutgoingReply::markdown(msg(MessageKey::SupportPrompt)),
        Prompt::SupportCancelled => OutgoingReply::plain(msg(MessageKey::SupportCancelled)),
    }
}
