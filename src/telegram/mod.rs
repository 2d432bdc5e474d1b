//! Telegram Bot API transport: typed updates, the HTTP client and the
//! long-polling listener.

pub mod api;
pub mod format;
pub mod poller;
pub mod types;

pub use api::TelegramApi;
pub use poller::spawn_poller;
pub use types::{Message, Update, User};
