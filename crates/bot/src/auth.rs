//! Sender registration.

use autokarma_db::models::user::{UpsertUser, User};
use autokarma_db::repositories::UserRepo;
use autokarma_db::DbPool;
use autokarma_telegram::User as TelegramUser;

use crate::error::BotError;

/// Profile fields to store for `from`.
pub fn profile(from: &TelegramUser) -> UpsertUser {
    UpsertUser {
        telegram_id: from.id,
        username: from.username.clone(),
        first_name: Some(from.first_name.clone()),
        last_name: from.last_name.clone(),
        language_code: from.language_code.clone(),
    }
}

/// Create the sender's user row, or refresh its profile and activity time.
pub async fn register_sender(pool: &DbPool, from: &TelegramUser) -> Result<User, BotError> {
    let user = UserRepo::upsert_from_telegram(pool, &profile(from)).await?;
    Ok(user)
}
