//! The messaging operations the bot performs, as a trait so that handlers
//! can be driven without a live Bot API.

use async_trait::async_trait;
use autokarma_telegram::{Message, OutgoingMessage, TelegramApi, TelegramApiError};

#[async_trait]
pub trait ChatApi: Send + Sync + 'static {
    async fn send_message(
        &self,
        chat_id: i64,
        message: &OutgoingMessage,
    ) -> Result<Message, TelegramApiError>;

    async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        message: &OutgoingMessage,
    ) -> Result<(), TelegramApiError>;

    async fn delete_message(&self, chat_id: i64, message_id: i64) -> Result<(), TelegramApiError>;

    async fn answer_callback_query(
        &self,
        callback_query_id: &str,
        text: Option<&str>,
    ) -> Result<(), TelegramApiError>;
}

#[async_trait]
impl ChatApi for TelegramApi {
    async fn send_message(
        &self,
        chat_id: i64,
        message: &OutgoingMessage,
    ) -> Result<Message, TelegramApiError> {
        TelegramApi::send_message(self, chat_id, message).await
    }

    async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        message: &OutgoingMessage,
    ) -> Result<(), TelegramApiError> {
        TelegramApi::edit_message_text(self, chat_id, message_id, message).await
    }

    async fn delete_message(&self, chat_id: i64, message_id: i64) -> Result<(), TelegramApiError> {
        TelegramApi::delete_message(self, chat_id, message_id).await
    }

    async fn answer_callback_query(
        &self,
        callback_query_id: &str,
        text: Option<&str>,
    ) -> Result<(), TelegramApiError> {
        TelegramApi::answer_callback_query(self, callback_query_id, text).await
    }
}
