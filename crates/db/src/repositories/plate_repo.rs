//! Repository for the `car_plates` table.
//!
//! Besides plain reads, [`PlateRepo::apply_rating`] performs the whole
//! rating write (aggregate upsert, daily-limit re-check, action append) in
//! one transaction.

use autokarma_core::day_window::DayWindow;
use autokarma_core::ledger::NewRating;
use autokarma_core::rating::ActionType;
use autokarma_core::records::RankDirection;
use autokarma_core::types::DbId;
use sqlx::PgPool;

use crate::models::karma_action::KarmaActionRow;
use crate::models::plate::CarPlate;

/// Column list for `car_plates` queries.
const COLUMNS: &str = "\
    id, plate_number, karma, total_positive, total_negative, created_at, updated_at";

/// Column list for `karma_actions` rows returned from the rating transaction.
const ACTION_COLUMNS: &str = "\
    id, plate_id, user_id, action_type, karma_change, description, created_at";

/// Result of [`PlateRepo::apply_rating`].
#[derive(Debug)]
pub enum ApplyRatingResult {
    /// Both rows were written and committed.
    Applied {
        plate: CarPlate,
        action: KarmaActionRow,
    },
    /// An action for the same user, plate and day already exists; the
    /// transaction was rolled back.
    AlreadyRated,
}

/// Provides queries for plate aggregates.
pub struct PlateRepo;

impl PlateRepo {
    /// Find a plate by its normalized number.
    pub async fn find_by_number(
        pool: &PgPool,
        plate_number: &str,
    ) -> Result<Option<CarPlate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM car_plates WHERE plate_number = $1");
        sqlx::query_as::<_, CarPlate>(&query)
            .bind(plate_number)
            .fetch_optional(pool)
            .await
    }

    /// Plates ranked by karma. Ties keep insertion order.
    pub async fn list_ranked(
        pool: &PgPool,
        direction: RankDirection,
        limit: i64,
    ) -> Result<Vec<CarPlate>, sqlx::Error> {
        let order = match direction {
            RankDirection::Best => "karma DESC",
            RankDirection::Worst => "karma ASC",
        };
        let query = format!("SELECT {COLUMNS} FROM car_plates ORDER BY {order}, id ASC LIMIT $1");
        sqlx::query_as::<_, CarPlate>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Apply one rating atomically.
    ///
    /// 1. `INSERT ... ON CONFLICT DO UPDATE` creates the plate or increments
    ///    its karma and the matching counter; either way the row stays
    ///    locked until commit, serializing concurrent ratings of one plate.
    /// 2. The daily limit is re-checked under that lock, so a concurrent
    ///    duplicate from the same user that committed first is seen here.
    /// 3. The action is appended and the transaction commits.
    pub async fn apply_rating(
        pool: &PgPool,
        rating: &NewRating,
    ) -> Result<ApplyRatingResult, sqlx::Error> {
        let (positive, negative) = match rating.action_type {
            ActionType::Positive => (1, 0),
            ActionType::Negative => (0, 1),
        };

        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO car_plates (plate_number, karma, total_positive, total_negative) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (plate_number) DO UPDATE SET \
                 karma = car_plates.karma + EXCLUDED.karma, \
                 total_positive = car_plates.total_positive + EXCLUDED.total_positive, \
                 total_negative = car_plates.total_negative + EXCLUDED.total_negative \
             RETURNING {COLUMNS}"
        );
        let plate = sqlx::query_as::<_, CarPlate>(&query)
            .bind(&rating.plate_number)
            .bind(rating.karma_change)
            .bind(positive)
            .bind(negative)
            .fetch_one(&mut *tx)
            .await?;

        let already_rated = exists_in_window(&mut tx, plate.id, rating.user_id, rating.window).await?;
        if already_rated {
            tx.rollback().await?;
            return Ok(ApplyRatingResult::AlreadyRated);
        }

        let query = format!(
            "INSERT INTO karma_actions \
                 (plate_id, user_id, action_type, karma_change, description, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {ACTION_COLUMNS}"
        );
        let action = sqlx::query_as::<_, KarmaActionRow>(&query)
            .bind(plate.id)
            .bind(rating.user_id)
            .bind(rating.action_type.as_str())
            .bind(rating.karma_change)
            .bind(&rating.description)
            .bind(rating.created_at)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(ApplyRatingResult::Applied { plate, action })
    }
}

/// Whether `user_id` has an action on `plate_id` inside `window`, within `tx`.
async fn exists_in_window(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    plate_id: DbId,
    user_id: DbId,
    window: DayWindow,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS ( \
             SELECT 1 FROM karma_actions \
             WHERE plate_id = $1 AND user_id = $2 \
               AND created_at >= $3 AND created_at < $4 \
         )",
    )
    .bind(plate_id)
    .bind(user_id)
    .bind(window.start)
    .bind(window.end)
    .fetch_one(&mut **tx)
    .await
}
