//! Wire types for the parts of the Bot API the bot uses.
//!
//! Unknown fields are ignored, so new API additions do not break decoding.

use serde::{Deserialize, Serialize};

use crate::keyboard::InlineKeyboardMarkup;

/// Response envelope shared by every Bot API method.
#[derive(Debug, Deserialize)]
pub struct ResponseEnvelope<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<u16>,
}

/// One incoming update. Only message and callback updates are requested.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

impl Update {
    /// The user who caused the update, if any.
    pub fn sender(&self) -> Option<&User> {
        if let Some(query) = &self.callback_query {
            return Some(&query.from);
        }
        self.message.as_ref().and_then(|m| m.from.as_ref())
    }

    /// The chat the update belongs to, if any.
    pub fn chat_id(&self) -> Option<i64> {
        if let Some(message) = &self.message {
            return Some(message.chat.id);
        }
        self.callback_query
            .as_ref()
            .and_then(|q| q.message.as_ref())
            .map(|m| m.chat.id)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    pub message_id: i64,
    #[serde(default)]
    pub from: Option<User>,
    pub chat: Chat,
    /// Unix time; `0` for messages the bot can no longer access.
    #[serde(default)]
    pub date: i64,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub language_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    /// The message carrying the pressed button.
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub data: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseMode {
    Markdown,
    #[serde(rename = "MarkdownV2")]
    MarkdownV2,
    #[serde(rename = "HTML")]
    Html,
}

/// Text plus optional formatting and keyboard, as sent or edited.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingMessage {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<ParseMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

impl OutgoingMessage {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parse_mode: None,
            reply_markup: None,
        }
    }

    pub fn markdown(text: impl Into<String>) -> Self {
        Self {
            parse_mode: Some(ParseMode::Markdown),
            ..Self::plain(text)
        }
    }

    pub fn with_keyboard(mut self, keyboard: InlineKeyboardMarkup) -> Self {
        self.reply_markup = Some(keyboard);
        self
    }
}
