use std::sync::Arc;

use autokarma_bot::Bot;
use autokarma_telegram::TelegramApi;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: autokarma_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// The bot that webhook updates are handed to.
    pub bot: Arc<Bot<TelegramApi>>,
    /// The bot's `@username` as reported by `getMe` at startup.
    pub bot_username: Option<String>,
}
