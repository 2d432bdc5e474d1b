//! Support dialogue: one message from the user, forwarded to the operators.

use super::{Effect, FlowInput, Prompt, SenderProfile, Transition};

/// The only step of the support dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportState {
    AwaitingMessage,
}

impl SupportState {
    pub fn start() -> Transition<Self> {
        Transition::to(Self::AwaitingMessage, Prompt::SupportPrompt)
    }

    pub fn on_input(self, input: FlowInput, sender: &SenderProfile) -> Transition<Self> {
        match input {
            FlowInput::Cancel => Transition::finish(Effect::Say(Prompt::SupportCancelled)),
            FlowInput::Text(text) => Transition::finish(Effect::Forward(SupportReport {
                first_name: sender.first_name.clone(),
                last_name: sender.last_name.clone(),
                user_id: sender.user_id,
                username: sender.username.clone(),
                text,
            })),
            FlowInput::Skip | FlowInput::Confirm => Transition::to(self, Prompt::SupportPrompt),
        }
    }
}

/// A ticket for the operator chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportReport {
    pub first_name: String,
    pub last_name: Option<String>,
    pub user_id: i64,
    pub username: Option<String>,
    pub text: String,
}

impl SupportReport {
    /// Operator-facing Markdown text.
    pub fn render(&self) -> String {
        format!(
            "**New Support Request**\n\n\
             **From:** {} {}\n\
             **User ID:** `{}`\n\
             **Username:** @{}\n\n\
             --- Message ---\n\
             {}",
            self.first_name,
            self.last_name.as_deref().unwrap_or(""),
            self.user_id,
            self.username.as_deref().unwrap_or("N/A"),
            self.text
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sender() -> SenderProfile {
        SenderProfile {
            user_id: 7,
            first_name: "Ana".into(),
            last_name: Some("Lima".into()),
            username: Some("ana_l".into()),
            language_code: Some("pt".into()),
        }
    }

    #[test]
    fn start_prompts() {
        let t = SupportState::start();
        assert_eq!(t.next, Some(SupportState::AwaitingMessage));
        assert_eq!(t.effects, vec![Effect::Say(Prompt::SupportPrompt)]);
    }

    #[test]
    fn text_forwards_and_ends() {
        let t = SupportState::AwaitingMessage.on_input(FlowInput::Text("app crashes".into()), &sender());
        assert!(t.next.is_none());
        match &t.effects[..] {
            [Effect::Forward(report)] => {
                assert_eq!(report.user_id, 7);
                assert_eq!(report.text, "app crashes");
            }
            other => panic!("unexpected effects: {other:?}"),
        }
    }

    #[test]
    fn cancel_ends() {
        let t = SupportState::AwaitingMessage.on_input(FlowInput::Cancel, &sender());
        assert!(t.next.is_none());
        assert_eq!(t.effects, vec![Effect::Say(Prompt::SupportCancelled)]);
    }

    #[test]
    fn flow_commands_reprompt() {
        let t = SupportState::AwaitingMessage.on_input(FlowInput::Confirm, &sender());
        assert_eq!(t.next, Some(SupportState::AwaitingMessage));
    }

    #[test]
    fn report_format() {
        let report = SupportReport {
            first_name: "Ana".into(),
            last_name: Some("Lima".into()),
            user_id: 7,
            username: Some("ana_l".into()),
            text: "help".into(),
        };
        assert_eq!(
            report.render(),
            "**New Support Request**\n\n**From:** Ana Lima\n**User ID:** `7`\n**Username:** @ana_l\n\n--- Message ---\nhelp"
        );
    }

    #[test]
    fn report_placeholders_for_missing_fields() {
        let report = SupportReport {
            first_name: "Bob".into(),
            last_name: None,
            user_id: 1,
            username: None,
            text: "x".into(),
        };
        let text = report.render();
        assert!(text.contains("**From:** Bob \n"));
        assert!(text.contains("**Username:** @N/A\n"));
    }
}
