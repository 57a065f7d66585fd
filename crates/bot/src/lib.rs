//! Conversational layer of the plate karma bot.
//!
//! [`Bot`] turns Telegram updates into ledger calls and replies:
//!
//! - [`dispatcher`]: routes an update to a handler, answering every callback
//! - [`auth`]: registers or refreshes the sender before handling
//! - [`handlers`]: one method per screen
//! - [`messages`]: keeps the chat tidy by editing or replacing bot messages
//! - [`polling`]: long-polling delivery loop
//!
//! Webhook delivery lives in the API crate and calls
//! [`Bot::handle_update`] directly.

pub mod auth;
pub mod bot;
pub mod callback;
pub mod chat;
pub mod dispatcher;
pub mod error;
pub mod handlers;
pub mod keyboards;
pub mod messages;
pub mod polling;
pub mod render;
pub mod session;

pub use bot::{Bot, UpdateContext};
pub use chat::ChatApi;
pub use error::BotError;
