//! Repository for the `karma_actions` table.
//!
//! The table is append-only. Rows are written by
//! [`PlateRepo::apply_rating`](crate::repositories::PlateRepo::apply_rating).

use autokarma_core::day_window::DayWindow;
use autokarma_core::types::DbId;
use sqlx::PgPool;

use crate::models::karma_action::{KarmaActionRow, KarmaActionWithPlate};

/// Column list for `karma_actions` queries.
const COLUMNS: &str = "\
    id, plate_id, user_id, action_type, karma_change, description, created_at";

/// Same columns qualified with the `ka` alias, plus the joined plate number.
const JOINED_COLUMNS: &str = "\
    ka.id, ka.plate_id, ka.user_id, ka.action_type, ka.karma_change, \
    ka.description, ka.created_at, cp.plate_number";

/// Provides queries for the karma action log.
pub struct KarmaActionRepo;

impl KarmaActionRepo {
    /// Whether `user_id` rated `plate_number` inside `window`.
    pub async fn exists_in_window(
        pool: &PgPool,
        plate_number: &str,
        user_id: DbId,
        window: DayWindow,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS ( \
                 SELECT 1 FROM karma_actions ka \
                 JOIN car_plates cp ON cp.id = ka.plate_id \
                 WHERE cp.plate_number = $1 AND ka.user_id = $2 \
                   AND ka.created_at >= $3 AND ka.created_at < $4 \
             )",
        )
        .bind(plate_number)
        .bind(user_id)
        .bind(window.start)
        .bind(window.end)
        .fetch_one(pool)
        .await
    }

    /// A user's actions with plate numbers, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<KarmaActionWithPlate>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM karma_actions ka \
             JOIN car_plates cp ON cp.id = ka.plate_id \
             WHERE ka.user_id = $1 \
             ORDER BY ka.created_at DESC, ka.id DESC \
             LIMIT $2"
        );
        sqlx::query_as::<_, KarmaActionWithPlate>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// All actions on a plate, oldest first.
    pub async fn list_for_plate(
        pool: &PgPool,
        plate_id: DbId,
    ) -> Result<Vec<KarmaActionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM karma_actions \
             WHERE plate_id = $1 \
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, KarmaActionRow>(&query)
            .bind(plate_id)
            .fetch_all(pool)
            .await
    }
}
