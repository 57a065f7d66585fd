//! Keeps each chat down to one live bot screen.
//!
//! The ids of the bot's last few messages to a user are tracked in the
//! session. Sending a new screen deletes the tracked ones first; editing
//! reuses the pressed (or last tracked) message and falls back to sending.

use autokarma_telegram::OutgoingMessage;

use crate::bot::{Bot, UpdateContext};
use crate::chat::ChatApi;
use crate::error::BotError;

impl<C: ChatApi> Bot<C> {
    /// Delete the tracked messages, then send `message` and track it.
    pub async fn send(&self, cx: &UpdateContext, message: &OutgoingMessage) -> Result<(), BotError> {
        let previous = self
            .sessions()
            .update(cx.telegram_id, |s| s.messages.take_all());
        self.delete_messages(cx.chat_id, previous).await;

        let sent = self.chat().send_message(cx.chat_id, message).await?;
        self.sessions()
            .update(cx.telegram_id, |s| s.messages.track(sent.message_id));
        Ok(())
    }

    /// Show `message` in place of the pressed message (or the last tracked
    /// one), sending a fresh message when editing is impossible.
    pub async fn edit_or_send(
        &self,
        cx: &UpdateContext,
        message: &OutgoingMessage,
    ) -> Result<(), BotError> {
        let target = match cx.callback_message_id {
            Some(message_id) => {
                let stale = self
                    .sessions()
                    .update(cx.telegram_id, |s| s.messages.take_all_except(message_id));
                self.delete_messages(cx.chat_id, stale).await;
                Some(message_id)
            }
            None => self
                .sessions()
                .update(cx.telegram_id, |s| s.messages.last()),
        };

        let Some(message_id) = target else {
            return self.send(cx, message).await;
        };

        match self
            .chat()
            .edit_message_text(cx.chat_id, message_id, message)
            .await
        {
            Ok(()) => {}
            Err(e) if e.is_not_modified() => {
                tracing::debug!(chat_id = cx.chat_id, message_id, "Message unchanged, edit skipped");
            }
            Err(e) if e.is_message_gone() => {
                tracing::debug!(chat_id = cx.chat_id, message_id, "Message gone, sending a new one");
                return self.send(cx, message).await;
            }
            Err(e) => {
                tracing::warn!(
                    chat_id = cx.chat_id,
                    message_id,
                    error = %e,
                    "Edit failed, sending a new message",
                );
                return self.send(cx, message).await;
            }
        }

        self.sessions()
            .update(cx.telegram_id, |s| s.messages.track(message_id));
        Ok(())
    }

    /// Best-effort deletion; messages may already be gone.
    async fn delete_messages(&self, chat_id: i64, message_ids: Vec<i64>) {
        for message_id in message_ids {
            if let Err(e) = self.chat().delete_message(chat_id, message_id).await {
                tracing::debug!(chat_id, message_id, error = %e, "Could not delete message");
            }
        }
    }
}
