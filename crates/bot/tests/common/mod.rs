//! Shared helpers for bot integration tests.

use std::sync::Mutex;

use async_trait::async_trait;
use autokarma_bot::{Bot, ChatApi};
use autokarma_telegram::{Chat, Message, OutgoingMessage, TelegramApiError, Update};
use chrono::FixedOffset;
use serde_json::json;
use sqlx::PgPool;

/// First id handed out for sent messages.
const FIRST_SENT_ID: i64 = 1000;

/// One call made through [`RecordingChat`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Send { message_id: i64, text: String, buttons: Vec<String> },
    Edit { message_id: i64, text: String, buttons: Vec<String> },
    Delete { message_id: i64 },
    Answer { text: Option<String> },
}

#[derive(Default)]
struct Recorded {
    calls: Vec<Call>,
    next_id: i64,
    edit_error: Option<String>,
}

/// In-memory [`ChatApi`] that records every call.
#[derive(Default)]
pub struct RecordingChat {
    inner: Mutex<Recorded>,
}

impl RecordingChat {
    /// Make every subsequent edit fail with `description`.
    pub fn fail_edits_with(&self, description: &str) {
        self.inner.lock().unwrap().edit_error = Some(description.to_string());
    }

    /// Calls recorded since the last drain.
    pub fn drain(&self) -> Vec<Call> {
        std::mem::take(&mut self.inner.lock().unwrap().calls)
    }
}

fn buttons(message: &OutgoingMessage) -> Vec<String> {
    message
        .reply_markup
        .as_ref()
        .map(|k| k.callback_data().map(String::from).collect())
        .unwrap_or_default()
}

#[async_trait]
impl ChatApi for RecordingChat {
    async fn send_message(
        &self,
        chat_id: i64,
        message: &OutgoingMessage,
    ) -> Result<Message, TelegramApiError> {
        let mut inner = self.inner.lock().unwrap();
        let message_id = FIRST_SENT_ID + inner.next_id;
        inner.next_id += 1;
        inner.calls.push(Call::Send {
            message_id,
            text: message.text.clone(),
            buttons: buttons(message),
        });
        Ok(Message {
            message_id,
            from: None,
            chat: Chat {
                id: chat_id,
                kind: "private".to_string(),
            },
            date: 0,
            text: Some(message.text.clone()),
        })
    }

    async fn edit_message_text(
        &self,
        _chat_id: i64,
        message_id: i64,
        message: &OutgoingMessage,
    ) -> Result<(), TelegramApiError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::Edit {
            message_id,
            text: message.text.clone(),
            buttons: buttons(message),
        });
        match &inner.edit_error {
            Some(description) => Err(TelegramApiError::Api {
                status: 400,
                description: description.clone(),
            }),
            None => Ok(()),
        }
    }

    async fn delete_message(&self, _chat_id: i64, message_id: i64) -> Result<(), TelegramApiError> {
        self.inner
            .lock()
            .unwrap()
            .calls
            .push(Call::Delete { message_id });
        Ok(())
    }

    async fn answer_callback_query(
        &self,
        _callback_query_id: &str,
        text: Option<&str>,
    ) -> Result<(), TelegramApiError> {
        self.inner.lock().unwrap().calls.push(Call::Answer {
            text: text.map(String::from),
        });
        Ok(())
    }
}

pub fn msk() -> FixedOffset {
    FixedOffset::east_opt(3 * 3600).unwrap()
}

pub fn build_bot(pool: PgPool) -> Bot<RecordingChat> {
    Bot::new(RecordingChat::default(), pool, msk(), 100)
}

fn sender(telegram_id: i64) -> serde_json::Value {
    json!({
        "id": telegram_id,
        "is_bot": false,
        "first_name": "Driver",
        "username": format!("driver{telegram_id}"),
        "language_code": "en"
    })
}

/// A private text message from `telegram_id`.
pub fn text_update(telegram_id: i64, text: &str) -> Update {
    serde_json::from_value(json!({
        "update_id": 1,
        "message": {
            "message_id": 1,
            "from": sender(telegram_id),
            "chat": {"id": telegram_id, "type": "private"},
            "date": 1_700_000_000,
            "text": text
        }
    }))
    .unwrap()
}

/// A button press on message `message_id` in `telegram_id`'s private chat.
pub fn callback_update(telegram_id: i64, message_id: i64, data: &str) -> Update {
    serde_json::from_value(json!({
        "update_id": 2,
        "callback_query": {
            "id": format!("cb-{telegram_id}-{message_id}"),
            "from": sender(telegram_id),
            "message": {
                "message_id": message_id,
                "chat": {"id": telegram_id, "type": "private"},
                "date": 1_700_000_000
            },
            "data": data
        }
    }))
    .unwrap()
}

/// Text of the last send or edit.
pub fn last_screen(calls: &[Call]) -> &str {
    calls
        .iter()
        .rev()
        .find_map(|call| match call {
            Call::Send { text, .. } | Call::Edit { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .expect("a screen was shown")
}
