//! Telegram Bot API adapter.

mod invite_issuer;

pub use invite_issuer::{BotApiConfig, TelegramInviteIssuer};
