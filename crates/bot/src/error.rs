use autokarma_core::error::CoreError;
use autokarma_telegram::TelegramApiError;

#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Telegram(#[from] TelegramApiError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
