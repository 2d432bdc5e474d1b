//! Multi-step dialogues: registration and support.
//!
//! Each flow is a pure transition function over its own state type. The
//! [`engine::ConversationEngine`] loads state from the session store, runs
//! the transition, persists the result and carries out the effects.

pub mod engine;
pub mod input;
pub mod registration;
pub mod support;

pub use engine::ConversationEngine;
pub use input::{FlowInput, SenderProfile};
pub use registration::{RegistrationDraft, RegistrationState, RegistrationStep};
pub use support::{SupportReport, SupportState};

use crate::backend::RegistrationRequest;

/// Result of feeding one input to a flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition<S> {
    /// `None` ends the flow and removes its session.
    pub next: Option<S>,
    pub effects: Vec<Effect>,
}

impl<S> Transition<S> {
    /// Move to `state` (possibly the current one) and say `prompt`.
    pub fn to(state: S, prompt: Prompt) -> Self {
        Self {
            next: Some(state),
            effects: vec![Effect::Say(prompt)],
        }
    }

    pub fn finish(effect: Effect) -> Self {
        Self {
            next: None,
            effects: vec![effect],
        }
    }

    /// Wrap the next state, e.g. into a [`crate::session::FlowState`].
    pub fn map<T>(self, f: impl FnOnce(S) -> T) -> Transition<T> {
        Transition {
            next: self.next.map(f),
            effects: self.effects,
        }
    }
}

/// Side effects requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Say(Prompt),
    /// Send the completed registration to the backend.
    Submit(RegistrationRequest),
    /// Forward a ticket to the operator chat.
    Forward(SupportReport),
}

/// Flow messages, rendered through the catalog by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    RegisterStart,
    InvalidEmail,
    AskFirstName { email: String, default_first_name: String },
    AskLastName,
    AskTimezone,
    Confirm {
        email: String,
        first_name: String,
        last_name: Option<String>,
        language_code: String,
        timezone: String,
    },
    ConfirmReminder,
    RegisterCancelled,
    SupportPrompt,
    SupportCancelled,
}
