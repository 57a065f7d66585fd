//! Integration tests for the ledger over [`PgKarmaStore`].
//!
//! - Aggregate creation and accumulation
//! - Daily limit, including the local-day boundary
//! - Concurrent ratings: duplicates and distinct users
//! - Rankings and user history
//! - User upsert

use std::sync::Arc;

use assert_matches::assert_matches;
use autokarma_core::error::CoreError;
use autokarma_core::ledger::KarmaLedger;
use autokarma_core::rating::{ActionType, RatingLevel};
use autokarma_core::records::{KarmaAction, RankDirection};
use autokarma_core::types::{DbId, Timestamp};
use autokarma_db::models::user::UpsertUser;
use autokarma_db::repositories::{KarmaActionRepo, PlateRepo, UserRepo};
use autokarma_db::PgKarmaStore;
use chrono::{Duration, FixedOffset, TimeZone, Utc};
use sqlx::PgPool;
use tokio::task::JoinSet;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const PLATE: &str = "А123ВС77";

fn msk() -> FixedOffset {
    FixedOffset::east_opt(3 * 3600).unwrap()
}

fn ledger(pool: &PgPool) -> KarmaLedger<PgKarmaStore> {
    KarmaLedger::new(PgKarmaStore::new(pool.clone()), msk())
}

/// 12:00 MSK.
fn noon() -> Timestamp {
    Utc.with_ymd_and_hms(2026, 5, 14, 9, 0, 0).unwrap()
}

async fn new_user(pool: &PgPool, telegram_id: i64) -> DbId {
    UserRepo::upsert_from_telegram(
        pool,
        &UpsertUser {
            telegram_id,
            username: Some(format!("user{telegram_id}")),
            ..UpsertUser::default()
        },
    )
    .await
    .unwrap()
    .id
}

async fn action_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM karma_actions")
        .fetch_one(pool)
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Ratings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_first_rating_creates_plate_and_action(pool: PgPool) {
    let ledger = ledger(&pool);
    let user = new_user(&pool, 1).await;

    assert!(ledger.lookup(PLATE).await.unwrap().is_none());

    let record = ledger
        .rate_at("а123вс 77", RatingLevel::Excellent, user, Some("polite driver"), noon())
        .await
        .unwrap();
    assert_eq!(record.plate_number, PLATE);
    assert_eq!(record.karma, 3);
    assert_eq!(record.total_positive, 1);
    assert_eq!(record.total_negative, 0);

    let actions = KarmaActionRepo::list_for_plate(&pool, record.id).await.unwrap();
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].user_id, user);
    assert_eq!(actions[0].action_type, "positive");
    assert_eq!(actions[0].karma_change, 3);
    assert_eq!(actions[0].description.as_deref(), Some("polite driver"));
    assert_eq!(actions[0].created_at, noon());

    let action = KarmaAction::try_from(actions[0].clone()).unwrap();
    assert_eq!(action.action_type, ActionType::Positive);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_aggregate_equals_sum_of_actions(pool: PgPool) {
    let ledger = ledger(&pool);
    let levels = [
        RatingLevel::Excellent,
        RatingLevel::Terrible,
        RatingLevel::Negative,
        RatingLevel::Positive,
        RatingLevel::Negative,
    ];

    for (i, level) in levels.into_iter().enumerate() {
        let user = new_user(&pool, 10 + i as i64).await;
        ledger.rate_at(PLATE, level, user, None, noon()).await.unwrap();
    }

    let record = ledger.lookup(PLATE).await.unwrap().unwrap();
    let actions = KarmaActionRepo::list_for_plate(&pool, record.id).await.unwrap();
    let sum: i32 = actions.iter().map(|a| a.karma_change).sum();
    assert_eq!(record.karma, sum);
    assert_eq!(record.karma, -1);
    assert_eq!(record.total_ratings() as usize, actions.len());
    assert_eq!(record.total_positive, 2);
    assert_eq!(record.total_negative, 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_second_rating_same_day_is_rejected(pool: PgPool) {
    let ledger = ledger(&pool);
    let user = new_user(&pool, 1).await;

    let first = ledger
        .rate_at(PLATE, RatingLevel::Positive, user, None, noon())
        .await
        .unwrap();
    let err = ledger
        .rate_at(PLATE, RatingLevel::Terrible, user, None, noon() + Duration::hours(3))
        .await
        .unwrap_err();

    assert_matches!(err, CoreError::AlreadyRatedToday { .. });
    let current = ledger.lookup(PLATE).await.unwrap().unwrap();
    assert_eq!(current.karma, first.karma);
    assert_eq!(current.total_ratings(), 1);
    assert_eq!(action_count(&pool).await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_local_midnight_starts_a_new_day(pool: PgPool) {
    let ledger = ledger(&pool);
    let user = new_user(&pool, 1).await;
    // 23:30 and 00:30 MSK.
    let late = Utc.with_ymd_and_hms(2026, 5, 14, 20, 30, 0).unwrap();
    let early = Utc.with_ymd_and_hms(2026, 5, 14, 21, 30, 0).unwrap();

    ledger
        .rate_at(PLATE, RatingLevel::Negative, user, None, late)
        .await
        .unwrap();
    assert!(ledger.has_rated_on(PLATE, user, late).await.unwrap());
    assert!(!ledger.has_rated_on(PLATE, user, early).await.unwrap());

    let record = ledger
        .rate_at(PLATE, RatingLevel::Negative, user, None, early)
        .await
        .unwrap();
    assert_eq!(record.karma, -2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_duplicates_apply_once(pool: PgPool) {
    let ledger = ledger(&pool);
    let user = new_user(&pool, 1).await;

    let (a, b) = tokio::join!(
        ledger.rate_at(PLATE, RatingLevel::Excellent, user, None, noon()),
        ledger.rate_at(PLATE, RatingLevel::Excellent, user, None, noon()),
    );

    let results = [a, b];
    let applied = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(applied, 1, "exactly one rating should win: {results:?}");
    assert!(results
        .iter()
        .any(|r| matches!(r, Err(CoreError::AlreadyRatedToday { .. }))));

    let record = ledger.lookup(PLATE).await.unwrap().unwrap();
    assert_eq!(record.karma, 3);
    assert_eq!(record.total_positive, 1);
    assert_eq!(action_count(&pool).await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_ratings_by_distinct_users_all_count(pool: PgPool) {
    let ledger = Arc::new(ledger(&pool));
    let mut users = Vec::new();
    for telegram_id in 1..=8 {
        users.push(new_user(&pool, telegram_id).await);
    }

    // Every task races to create the same new plate.
    let mut tasks = JoinSet::new();
    for (i, user) in users.into_iter().enumerate() {
        let ledger = Arc::clone(&ledger);
        let level = if i % 2 == 0 {
            RatingLevel::Excellent
        } else {
            RatingLevel::Negative
        };
        tasks.spawn(async move { ledger.rate_at(PLATE, level, user, None, noon()).await });
    }

    let mut applied = 0;
    while let Some(joined) = tasks.join_next().await {
        joined.unwrap().unwrap();
        applied += 1;
    }
    assert_eq!(applied, 8);

    let record = ledger.lookup(PLATE).await.unwrap().unwrap();
    let actions = KarmaActionRepo::list_for_plate(&pool, record.id).await.unwrap();
    let sum: i32 = actions.iter().map(|a| a.karma_change).sum();
    assert_eq!(actions.len(), 8);
    assert_eq!(record.karma, sum);
    assert_eq!(record.karma, 4 * 3 - 4);
    assert_eq!(record.total_positive, 4);
    assert_eq!(record.total_negative, 4);
    assert_eq!(record.total_positive + record.total_negative, 8);

    let plates: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM car_plates")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(plates, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_plate_writes_nothing(pool: PgPool) {
    let ledger = ledger(&pool);
    let user = new_user(&pool, 1).await;

    let err = ledger
        .rate_at("АБВ", RatingLevel::Positive, user, None, noon())
        .await
        .unwrap_err();
    assert_matches!(err, CoreError::InvalidPlate(_));
    assert_eq!(action_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_user_fails_as_store_error(pool: PgPool) {
    let ledger = ledger(&pool);

    let err = ledger
        .rate_at(PLATE, RatingLevel::Positive, 9_999, None, noon())
        .await
        .unwrap_err();
    assert_matches!(err, CoreError::Store(_));
    // The aggregate upsert was rolled back with the failed insert.
    assert!(PlateRepo::find_by_number(&pool, PLATE).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Rankings and history
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_rankings(pool: PgPool) {
    let ledger = ledger(&pool);
    let user = new_user(&pool, 1).await;
    let plates = [
        ("А111АА77", RatingLevel::Positive),
        ("В222ВВ77", RatingLevel::Terrible),
        ("Е333ЕЕ77", RatingLevel::Excellent),
        ("К444КК77", RatingLevel::Negative),
    ];
    for (plate, level) in plates {
        ledger.rate_at(plate, level, user, None, noon()).await.unwrap();
    }

    let best: Vec<String> = ledger
        .top_plates(3, RankDirection::Best)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.plate_number)
        .collect();
    assert_eq!(best, ["Е333ЕЕ77", "А111АА77", "К444КК77"]);

    let worst: Vec<i32> = ledger
        .top_plates(10, RankDirection::Worst)
        .await
        .unwrap()
        .iter()
        .map(|p| p.karma)
        .collect();
    assert_eq!(worst, [-3, -1, 1, 3]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_user_history_newest_first(pool: PgPool) {
    let ledger = ledger(&pool);
    let user = new_user(&pool, 1).await;
    let other = new_user(&pool, 2).await;

    ledger
        .rate_at("А111АА77", RatingLevel::Positive, user, None, noon())
        .await
        .unwrap();
    ledger
        .rate_at("В222ВВ77", RatingLevel::Terrible, user, None, noon() + Duration::hours(1))
        .await
        .unwrap();
    ledger
        .rate_at("А111АА77", RatingLevel::Excellent, other, None, noon())
        .await
        .unwrap();

    let history = ledger.user_history(user, 20).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].plate_number, "В222ВВ77");
    assert_eq!(history[0].action.action_type, ActionType::Negative);
    assert_eq!(history[0].action.karma_change, -3);
    assert_eq!(history[1].plate_number, "А111АА77");

    assert!(ledger.user_history(user, 0).await.unwrap().is_empty());
    assert_eq!(ledger.user_history(user, 1).await.unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_user_upsert_refreshes_profile(pool: PgPool) {
    let created = UserRepo::upsert_from_telegram(
        &pool,
        &UpsertUser {
            telegram_id: 42,
            username: Some("before".to_string()),
            first_name: Some("Ann".to_string()),
            ..UpsertUser::default()
        },
    )
    .await
    .unwrap();

    let updated = UserRepo::upsert_from_telegram(
        &pool,
        &UpsertUser {
            telegram_id: 42,
            username: Some("after".to_string()),
            first_name: Some("Ann".to_string()),
            language_code: Some("ru".to_string()),
            ..UpsertUser::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(created.id, updated.id);
    assert_eq!(updated.username.as_deref(), Some("after"));
    assert_eq!(updated.language_code.as_deref(), Some("ru"));
    assert!(updated.last_activity_at >= created.last_activity_at);
    assert_eq!(UserRepo::count(&pool).await.unwrap(), 1);

    let found = UserRepo::find_by_telegram_id(&pool, 42).await.unwrap().unwrap();
    assert_eq!(found.id, created.id);
    assert!(UserRepo::find_by_telegram_id(&pool, 43).await.unwrap().is_none());
    assert!(UserRepo::find_by_id(&pool, created.id).await.unwrap().is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_seed_demo_data(pool: PgPool) {
    let summary = autokarma_db::seed::seed_demo_data(&pool, msk()).await.unwrap();
    assert_eq!(summary.users, 2);
    assert_eq!(summary.plates, 10);
    assert_eq!(action_count(&pool).await, summary.actions as i64);

    // Reseeding replaces rather than accumulates.
    let again = autokarma_db::seed::seed_demo_data(&pool, msk()).await.unwrap();
    assert_eq!(action_count(&pool).await, again.actions as i64);
    assert_eq!(UserRepo::count(&pool).await.unwrap(), 2);

    let best = PlateRepo::list_ranked(&pool, RankDirection::Best, 1).await.unwrap();
    assert_eq!(best[0].plate_number, "А123ВС77");
}
