//! PostgreSQL-backed [`KarmaStore`].

use async_trait::async_trait;
use autokarma_core::day_window::DayWindow;
use autokarma_core::error::StoreError;
use autokarma_core::ledger::{KarmaStore, NewRating, RatingOutcome};
use autokarma_core::records::{HistoryEntry, PlateRecord, RankDirection};
use autokarma_core::types::DbId;
use sqlx::PgPool;

use crate::repositories::{ApplyRatingResult, KarmaActionRepo, PlateRepo};

/// Ledger store over the `car_plates` and `karma_actions` tables.
#[derive(Clone)]
pub struct PgKarmaStore {
    pool: PgPool,
}

impl PgKarmaStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl KarmaStore for PgKarmaStore {
    async fn find_plate(&self, plate_number: &str) -> Result<Option<PlateRecord>, StoreError> {
        let plate = PlateRepo::find_by_number(&self.pool, plate_number).await?;
        Ok(plate.map(PlateRecord::from))
    }

    async fn has_action_in_window(
        &self,
        plate_number: &str,
        user_id: DbId,
        window: DayWindow,
    ) -> Result<bool, StoreError> {
        Ok(KarmaActionRepo::exists_in_window(&self.pool, plate_number, user_id, window).await?)
    }

    async fn apply_rating(&self, rating: &NewRating) -> Result<RatingOutcome, StoreError> {
        match PlateRepo::apply_rating(&self.pool, rating).await? {
            ApplyRatingResult::Applied { plate, action } => {
                tracing::debug!(
                    plate_id = plate.id,
                    action_id = action.id,
                    user_id = rating.user_id,
                    karma_change = rating.karma_change,
                    karma = plate.karma,
                    "Rating applied",
                );
                Ok(RatingOutcome::Applied(plate.into()))
            }
            ApplyRatingResult::AlreadyRated => {
                tracing::info!(
                    plate = %rating.plate_number,
                    user_id = rating.user_id,
                    "Concurrent duplicate rating rolled back",
                );
                Ok(RatingOutcome::AlreadyRatedToday)
            }
        }
    }

    async fn top_plates(
        &self,
        direction: RankDirection,
        limit: i64,
    ) -> Result<Vec<PlateRecord>, StoreError> {
        let plates = PlateRepo::list_ranked(&self.pool, direction, limit).await?;
        Ok(plates.into_iter().map(PlateRecord::from).collect())
    }

    async fn user_history(&self, user_id: DbId, limit: i64) -> Result<Vec<HistoryEntry>, StoreError> {
        let rows = KarmaActionRepo::list_for_user(&self.pool, user_id, limit).await?;
        let entries = rows
            .into_iter()
            .map(HistoryEntry::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}
