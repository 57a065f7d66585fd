//! One method per screen.
//!
//! Expected outcomes (invalid plate, already rated today) are shown to the
//! user here. Anything else propagates to the dispatcher, which logs it and
//! shows a generic failure.

use autokarma_core::error::CoreError;
use autokarma_core::ledger::{DEFAULT_HISTORY_LIMIT, DEFAULT_TOP_LIMIT};
use autokarma_core::plate::PlateNumber;
use autokarma_core::rating::RatingLevel;
use autokarma_core::records::RankDirection;

use crate::bot::{Bot, UpdateContext};
use crate::chat::ChatApi;
use crate::error::BotError;
use crate::render;
use crate::session::WaitingFor;

impl<C: ChatApi> Bot<C> {
    /// `/start`, the main menu button, and stray text.
    pub async fn show_main_menu(&self, cx: &UpdateContext) -> Result<(), BotError> {
        self.sessions()
            .update(cx.telegram_id, |s| s.waiting_for = None);
        self.edit_or_send(cx, &render::main_menu()).await
    }

    pub async fn show_help(&self, cx: &UpdateContext) -> Result<(), BotError> {
        self.edit_or_send(cx, &render::help()).await
    }

    /// Ask for a plate and remember what it is for.
    pub async fn prompt_for_plate(
        &self,
        cx: &UpdateContext,
        purpose: WaitingFor,
    ) -> Result<(), BotError> {
        self.edit_or_send(cx, &render::plate_prompt(purpose)).await?;
        self.sessions()
            .update(cx.telegram_id, |s| s.waiting_for = Some(purpose));
        Ok(())
    }

    /// Free text received while a plate prompt is pending.
    ///
    /// An invalid plate keeps the prompt pending so the user can retry.
    pub async fn handle_plate_input(
        &self,
        cx: &UpdateContext,
        text: &str,
        purpose: WaitingFor,
    ) -> Result<(), BotError> {
        let Ok(plate) = PlateNumber::parse(text) else {
            tracing::debug!(telegram_id = cx.telegram_id, "Rejected plate input");
            return self.send(cx, &render::invalid_plate()).await;
        };
        self.sessions()
            .update(cx.telegram_id, |s| s.waiting_for = None);

        match purpose {
            WaitingFor::PlateCheck => {
                let record = self.ledger().lookup(plate.as_str()).await?;
                self.send(cx, &render::karma_card(plate.as_str(), record.as_ref()))
                    .await
            }
            WaitingFor::PlateRate => self.send(cx, &render::rating_options(plate.as_str())).await,
        }
    }

    /// A rating button was pressed.
    pub async fn rate_plate(
        &self,
        cx: &UpdateContext,
        level: RatingLevel,
        plate: &str,
    ) -> Result<(), BotError> {
        let Some(user) = &cx.user else {
            tracing::warn!(telegram_id = cx.telegram_id, "Rating without a registered user");
            return self.send(cx, &render::failure()).await;
        };

        match self.ledger().rate(plate, level, user.id, None).await {
            Ok(record) => {
                tracing::info!(
                    plate = %record.plate_number,
                    user_id = user.id,
                    level = %level,
                    karma = record.karma,
                    "Rating added",
                );
                self.edit_or_send(cx, &render::rating_applied(&record, level))
                    .await
            }
            Err(CoreError::AlreadyRatedToday { plate }) => {
                tracing::info!(plate = %plate, user_id = user.id, "Plate already rated today");
                self.edit_or_send(cx, &render::already_rated(&plate)).await
            }
            Err(CoreError::InvalidPlate(input)) => {
                tracing::warn!(input = %input, "Rating callback carried an invalid plate");
                self.send(cx, &render::invalid_plate()).await
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn show_ranking(
        &self,
        cx: &UpdateContext,
        direction: RankDirection,
    ) -> Result<(), BotError> {
        let plates = self.ledger().top_plates(DEFAULT_TOP_LIMIT, direction).await?;
        self.edit_or_send(cx, &render::ranking(direction, &plates))
            .await
    }

    pub async fn show_activity(&self, cx: &UpdateContext) -> Result<(), BotError> {
        let Some(user) = &cx.user else {
            tracing::warn!(telegram_id = cx.telegram_id, "Activity without a registered user");
            return self.send(cx, &render::failure()).await;
        };

        let history = self
            .ledger()
            .user_history(user.id, DEFAULT_HISTORY_LIMIT)
            .await?;
        let offset = self.ledger().utc_offset();
        self.edit_or_send(cx, &render::activity(&history, offset))
            .await
    }

    pub async fn show_unknown_command(&self, cx: &UpdateContext) -> Result<(), BotError> {
        self.send(cx, &render::unknown_command()).await
    }
}
