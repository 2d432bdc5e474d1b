//! Registration dialogue: email → first name → last name → timezone → confirm.

use super::{Effect, FlowInput, Prompt, SenderProfile, Transition};
use crate::backend::RegistrationRequest;

/// Currency every new account starts with.
pub const DEFAULT_CURRENCY: &str = "USD";

/// The steps of the registration dialogue, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationStep {
    Email,
    Name,
    LastName,
    Timezone,
    Confirm,
}

impl RegistrationStep {
    /// The step that follows a valid answer, if any.
    pub fn next(&self) -> Option<RegistrationStep> {
        use RegistrationStep::*;
        match self {
            Email => Some(Name),
            Name => Some(LastName),
            LastName => Some(Timezone),
            Timezone => Some(Confirm),
            Confirm => None,
        }
    }

    /// Whether `/skip` is accepted at this step.
    pub fn is_optional(&self) -> bool {
        matches!(self, Self::Name | Self::LastName)
    }
}

impl std::fmt::Display for RegistrationStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Email => "email",
            Self::Name => "name",
            Self::LastName => "last_name",
            Self::Timezone => "timezone",
            Self::Confirm => "confirm",
        };
        write!(f, "{s}")
    }
}

/// Answers collected so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationDraft {
    pub telegram_id: String,
    pub email: Option<String>,
    /// Starts as the platform display name; `/skip` keeps it.
    pub first_name: String,
    pub last_name: Option<String>,
    pub language_code: String,
    /// Raw user text; the backend interprets it.
    pub timezone: Option<String>,
}

impl RegistrationDraft {
    pub fn new(sender: &SenderProfile) -> Self {
        Self {
            telegram_id: sender.key(),
            email: None,
            first_name: sender.first_name.clone(),
            last_name: None,
            language_code: sender
                .language_code
                .clone()
                .unwrap_or_else(|| "en".to_string()),
            timezone: None,
        }
    }

    /// First and last name joined by a single space. The space is kept
    /// even when no last name was given.
    pub fn full_name(&self) -> String {
        format!(
            "{} {}",
            self.first_name,
            self.last_name.as_deref().unwrap_or("")
        )
    }

    fn to_request(&self) -> RegistrationRequest {
        RegistrationRequest {
            telegram_id: self.telegram_id.clone(),
            email: self.email.clone().unwrap_or_default(),
            name: self.full_name(),
            language_code: self.language_code.clone(),
            timezone: self.timezone.clone().unwrap_or_default(),
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }

    fn confirm_prompt(&self) -> Prompt {
        Prompt::Confirm {
            email: self.email.clone().unwrap_or_default(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            language_code: self.language_code.clone(),
            timezone: self.timezone.clone().unwrap_or_default(),
        }
    }
}

/// Minimal sanity check; the backend does real validation.
pub fn is_plausible_email(text: &str) -> bool {
    text.contains('@') && text.contains('.')
}

/// A live registration session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationState {
    pub step: RegistrationStep,
    pub draft: RegistrationDraft,
}

impl RegistrationState {
    /// Fresh session for `/register`, with the opening prompt.
    pub fn start(sender: &SenderProfile) -> Transition<Self> {
        let state = Self {
            step: RegistrationStep::Email,
            draft: RegistrationDraft::new(sender),
        };
        let prompt = state.question();
        Transition::to(state, prompt)
    }

    /// Apply one input.
    pub fn on_input(self, input: FlowInput) -> Transition<Self> {
        use RegistrationStep::*;

        let Self { step, mut draft } = self;

        match (step, input) {
            (_, FlowInput::Cancel) => Transition::finish(Effect::Say(Prompt::RegisterCancelled)),

            (Confirm, FlowInput::Confirm) => Transition::finish(Effect::Submit(draft.to_request())),

            (step, FlowInput::Skip) if step.is_optional() => {
                if step == LastName {
                    draft.last_name = None;
                }
                Self { step, draft }.advance()
            }

            (Email, FlowInput::Text(text)) if is_plausible_email(text.trim()) => {
                draft.email = Some(text.trim().to_string());
                Self { step, draft }.advance()
            }
            (Name, FlowInput::Text(text)) if accepts_answer(&text) => {
                draft.first_name = text.trim().to_string();
                Self { step, draft }.advance()
            }
            (LastName, FlowInput::Text(text)) if accepts_answer(&text) => {
                draft.last_name = Some(text.trim().to_string());
                Self { step, draft }.advance()
            }
            (Timezone, FlowInput::Text(text)) if accepts_answer(&text) => {
                draft.timezone = Some(text.trim().to_string());
                Self { step, draft }.advance()
            }

            // Anything else leaves the step unchanged and asks again.
            (step, _) => {
                let state = Self { step, draft };
                let prompt = state.current_prompt();
                Transition::to(state, prompt)
            }
        }
    }

    /// Move to the following step and ask its question.
    fn advance(self) -> Transition<Self> {
        let Some(step) = self.step.next() else {
            let prompt = self.current_prompt();
            return Transition::to(self, prompt);
        };
        let state = Self { step, draft: self.draft };
        let prompt = state.question();
        Transition::to(state, prompt)
    }

    /// The prompt shown on first arriving at this step.
    fn question(&self) -> Prompt {
        match self.step {
            RegistrationStep::Email => Prompt::RegisterStart,
            RegistrationStep::Name => Prompt::AskFirstName {
                email: self.draft.email.clone().unwrap_or_default(),
                default_first_name: self.draft.first_name.clone(),
            },
            RegistrationStep::LastName => Prompt::AskLastName,
            RegistrationStep::Timezone => Prompt::AskTimezone,
            RegistrationStep::Confirm => self.draft.confirm_prompt(),
        }
    }

    /// The prompt that asks for this step's answer again.
    fn current_prompt(&self) -> Prompt {
        match self.step {
            RegistrationStep::Email => Prompt::InvalidEmail,
            RegistrationStep::Confirm => Prompt::ConfirmReminder,
            _ => self.question(),
        }
    }
}

fn accepts_answer(text: &str) -> bool {
    let text = text.trim();
    !text.is_empty() && !text.starts_with('/')
}
