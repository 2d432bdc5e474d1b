//! OkanAssist Telegram bot: relays chats to the financial-assistant API.

pub mod backend;
pub mod channel;
pub mod config;
pub mod conversation;
pub mod dispatch;
pub mod error;
pub mod health;
pub mod i18n;
pub mod lanes;
pub mod session;
pub mod telegram;
