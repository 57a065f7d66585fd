//! Update routing.

use autokarma_core::records::RankDirection;
use autokarma_telegram::{CallbackQuery, Message, Update, User as TelegramUser};

use crate::auth;
use crate::bot::{Bot, UpdateContext};
use crate::callback::Callback;
use crate::chat::ChatApi;
use crate::error::BotError;
use crate::render;
use crate::session::WaitingFor;

/// Toast shown for callback data the bot does not recognize.
const UNKNOWN_COMMAND_TOAST: &str = "❌ Unknown command";

/// A slash command in a text message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Other,
}

impl Command {
    /// `None` for text that is not a command. Handles the `/cmd@botname`
    /// form used in groups.
    pub fn parse(text: &str) -> Option<Self> {
        let word = text.split_whitespace().next()?.strip_prefix('/')?;
        let name = word.split('@').next().unwrap_or(word);
        Some(match name {
            "start" => Self::Start,
            "help" => Self::Help,
            _ => Self::Other,
        })
    }
}

impl<C: ChatApi> Bot<C> {
    /// Process one update. Failures are logged and reported to the user;
    /// they never reach the delivery loop.
    pub async fn handle_update(&self, update: Update) {
        let update_id = update.update_id;
        let chat_id = update.chat_id();
        let telegram_id = update.sender().map(|u| u.id);

        if let Err(e) = self.route(update).await {
            tracing::error!(update_id, ?chat_id, ?telegram_id, error = %e, "Failed to handle update");

            if let (Some(chat_id), Some(telegram_id)) = (chat_id, telegram_id) {
                let cx = UpdateContext {
                    chat_id,
                    telegram_id,
                    user: None,
                    callback_message_id: None,
                };
                if let Err(e) = self.send(&cx, &render::failure()).await {
                    tracing::warn!(chat_id, error = %e, "Could not report failure to user");
                }
            }
        }
    }

    async fn route(&self, update: Update) -> Result<(), BotError> {
        if let Some(query) = update.callback_query {
            return self.route_callback(query).await;
        }
        if let Some(message) = update.message {
            return self.route_message(message).await;
        }
        tracing::debug!(update_id = update.update_id, "Ignoring update without message or callback");
        Ok(())
    }

    async fn route_message(&self, message: Message) -> Result<(), BotError> {
        let (Some(from), Some(text)) = (message.from.as_ref(), message.text.as_deref()) else {
            return Ok(());
        };
        let cx = self.context(from, message.chat.id, None).await;

        match Command::parse(text) {
            Some(Command::Start) => self.show_main_menu(&cx).await,
            Some(Command::Help) => self.show_help(&cx).await,
            Some(Command::Other) => self.show_main_menu(&cx).await,
            None => {
                let pending = self
                    .sessions()
                    .update(cx.telegram_id, |s| s.waiting_for);
                match pending {
                    Some(purpose) => self.handle_plate_input(&cx, text, purpose).await,
                    None => self.show_main_menu(&cx).await,
                }
            }
        }
    }

    async fn route_callback(&self, query: CallbackQuery) -> Result<(), BotError> {
        let callback = Callback::parse(query.data.as_deref().unwrap_or_default());

        // Always answer so the client stops its spinner.
        let toast = matches!(callback, Callback::Unknown(_)).then_some(UNKNOWN_COMMAND_TOAST);
        if let Err(e) = self.chat().answer_callback_query(&query.id, toast).await {
            tracing::warn!(callback_query_id = %query.id, error = %e, "Could not answer callback query");
        }

        let Some(message) = query.message.as_ref() else {
            tracing::debug!(callback_query_id = %query.id, "Callback without an accessible message");
            return Ok(());
        };
        let cx = self
            .context(&query.from, message.chat.id, Some(message.message_id))
            .await;

        match callback {
            Callback::CheckKarma => self.prompt_for_plate(&cx, WaitingFor::PlateCheck).await,
            Callback::RateDriver => self.prompt_for_plate(&cx, WaitingFor::PlateRate).await,
            Callback::TopCars => self.show_ranking(&cx, RankDirection::Best).await,
            Callback::WorstCars => self.show_ranking(&cx, RankDirection::Worst).await,
            Callback::MyActivity => self.show_activity(&cx).await,
            Callback::Help => self.show_help(&cx).await,
            Callback::MainMenu => self.show_main_menu(&cx).await,
            Callback::Rate { level, plate } => self.rate_plate(&cx, level, &plate).await,
            Callback::Unknown(data) => {
                tracing::info!(data = %data, telegram_id = cx.telegram_id, "Unknown callback query");
                self.show_unknown_command(&cx).await
            }
        }
    }

    /// Build the context, registering the sender on the way. Registration
    /// failure is logged and the update proceeds without a user.
    async fn context(
        &self,
        from: &TelegramUser,
        chat_id: i64,
        callback_message_id: Option<i64>,
    ) -> UpdateContext {
        let user = match auth::register_sender(self.pool(), from).await {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::error!(telegram_id = from.id, error = %e, "Could not register sender");
                None
            }
        };
        UpdateContext {
            chat_id,
            telegram_id: from.id,
            user,
            callback_message_id,
        }
    }
}
