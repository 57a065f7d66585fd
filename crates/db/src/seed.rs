//! Demo data for local development.
//!
//! Ratings go through [`KarmaLedger`] so every seeded aggregate equals the
//! sum of its actions. Each demo plate gets a fixed sequence of ratings
//! spread over past days, alternating between the demo users.

use autokarma_core::error::CoreError;
use autokarma_core::ledger::KarmaLedger;
use autokarma_core::rating::RatingLevel;
use chrono::{Duration, FixedOffset, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::models::user::UpsertUser;
use crate::repositories::UserRepo;
use crate::store::PgKarmaStore;

use autokarma_core::rating::RatingLevel::{Excellent, Negative, Positive, Terrible};

/// Demo plates and the ratings applied to each, oldest first.
const DEMO_PLATES: &[(&str, &[RatingLevel])] = &[
    ("А123ВС77", &[Excellent, Excellent, Positive, Excellent, Positive]),
    ("В456ЕК99", &[Positive, Positive, Excellent]),
    ("Е789КМ197", &[Excellent, Positive, Negative, Positive]),
    ("К001НО50", &[Positive]),
    ("М555РС777", &[Negative, Positive]),
    ("Н321ТУ78", &[Negative, Terrible, Negative]),
    ("О777ХА99", &[Terrible, Terrible, Negative, Terrible]),
    ("Р404СТ77", &[Terrible, Negative]),
    ("С999ВЕ190", &[Negative]),
    ("Т111МН16", &[Terrible, Terrible, Terrible, Negative, Terrible]),
];

/// What [`seed_demo_data`] wrote.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SeedSummary {
    pub users: usize,
    pub plates: usize,
    pub actions: usize,
}

fn demo_users() -> [UpsertUser; 2] {
    [
        UpsertUser {
            telegram_id: 100_000_001,
            username: Some("demo_driver".to_string()),
            first_name: Some("Demo".to_string()),
            last_name: Some("Driver".to_string()),
            language_code: Some("en".to_string()),
        },
        UpsertUser {
            telegram_id: 100_000_002,
            username: Some("demo_observer".to_string()),
            first_name: Some("Demo".to_string()),
            last_name: Some("Observer".to_string()),
            language_code: Some("ru".to_string()),
        },
    ]
}

/// Clear plates and actions, then write the demo data set.
///
/// Users are upserted rather than cleared so real accounts survive a reseed.
pub async fn seed_demo_data(
    pool: &PgPool,
    utc_offset: FixedOffset,
) -> Result<SeedSummary, CoreError> {
    // `karma_actions` rejects row-level DELETE.
    sqlx::query("TRUNCATE karma_actions, car_plates RESTART IDENTITY")
        .execute(pool)
        .await
        .map_err(CoreError::store)?;

    let mut user_ids = Vec::new();
    for input in demo_users() {
        let user = UserRepo::upsert_from_telegram(pool, &input)
            .await
            .map_err(CoreError::store)?;
        user_ids.push(user.id);
    }

    let ledger = KarmaLedger::new(PgKarmaStore::new(pool.clone()), utc_offset);
    let now = Utc::now();
    let mut summary = SeedSummary {
        users: user_ids.len(),
        ..SeedSummary::default()
    };

    for (plate, levels) in DEMO_PLATES {
        for (i, level) in levels.iter().enumerate() {
            let user_id = user_ids[i % user_ids.len()];
            let days_ago = (levels.len() - i) as i64;
            ledger
                .rate_at(plate, *level, user_id, None, now - Duration::days(days_ago))
                .await?;
            summary.actions += 1;
        }
        summary.plates += 1;
    }

    tracing::info!(
        users = summary.users,
        plates = summary.plates,
        actions = summary.actions,
        "Demo data seeded",
    );
    Ok(summary)
}
