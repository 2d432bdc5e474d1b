//! Outgoing message types and the messenger abstraction.
//!
//! The conversation engine and dispatcher only talk to the chat platform
//! through [`Messenger`], so both can be exercised without a network.

use async_trait::async_trait;

use crate::error::ChannelError;

/// How the chat platform should interpret reply text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    Plain,
    /// Telegram's legacy Markdown.
    Markdown,
    MarkdownV2,
}

impl TextFormat {
    /// Value for Telegram's `parse_mode` field.
    pub fn parse_mode(&self) -> Option<&'static str> {
        match self {
            Self::Plain => None,
            Self::Markdown => Some("Markdown"),
            Self::MarkdownV2 => Some("MarkdownV2"),
        }
    }
}

/// A reply to send back to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingReply {
    pub text: String,
    pub format: TextFormat,
    pub link_preview: bool,
}

impl OutgoingReply {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: TextFormat::Plain,
            link_preview: true,
        }
    }

    pub fn markdown(text: impl Into<String>) -> Self {
        Self {
            format: TextFormat::Markdown,
            ..Self::plain(text)
        }
    }

    pub fn markdown_v2(text: impl Into<String>) -> Self {
        Self {
            format: TextFormat::MarkdownV2,
            ..Self::plain(text)
        }
    }

    pub fn with_link_preview(mut self, enabled: bool) -> Self {
        self.link_preview = enabled;
        self
    }
}

/// Chat platform operations the bot core relies on.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Deliver a reply to a chat.
    async fn send(&self, chat_id: &str, reply: &OutgoingReply) -> Result<(), ChannelError>;

    /// Fetch the bytes of a file the user uploaded.
    async fn download(&self, file_id: &str) -> Result<Vec<u8>, ChannelError>;
}
