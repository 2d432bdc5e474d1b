//! What the dialogue state machines consume.

use crate::i18n::Language;
use crate::telegram::User;

/// A user input routed into an active flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowInput {
    /// Free text that is not a command.
    Text(String),
    /// `/skip`
    Skip,
    /// `/confirm`
    Confirm,
    /// `/cancel`
    Cancel,
}

/// The sender details the flows need, detached from the Telegram update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderProfile {
    pub user_id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub language_code: Option<String>,
}

impl SenderProfile {
    /// Session-store key.
    pub fn key(&self) -> String {
        self.user_id.to_string()
    }

    pub fn language(&self) -> Language {
        Language::from_code(self.language_code.as_deref())
    }
}

impl From<&User> for SenderProfile {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            username: user.username.clone(),
            language_code: user.language_code.clone(),
        }
    }
}
