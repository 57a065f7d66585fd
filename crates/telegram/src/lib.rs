//! Minimal Telegram Bot API client.
//!
//! - [`api::TelegramApi`]: JSON-over-HTTPS calls used by the bot
//! - [`types`]: the subset of update/message objects the bot reads
//! - [`keyboard`]: inline keyboard markup builders

pub mod api;
pub mod keyboard;
pub mod types;

pub use api::{TelegramApi, TelegramApiError};
pub use keyboard::{InlineKeyboardButton, InlineKeyboardMarkup};
pub use types::{CallbackQuery, Chat, Message, OutgoingMessage, ParseMode, Update, User};
