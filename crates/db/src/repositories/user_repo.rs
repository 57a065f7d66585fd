//! Repository for the `users` table.

use autokarma_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{UpsertUser, User};

/// Column list for `users` queries.
const COLUMNS: &str = "\
    id, telegram_id, username, first_name, last_name, language_code, \
    last_activity_at, created_at, updated_at";

/// Provides queries for messaging-platform users.
pub struct UserRepo;

impl UserRepo {
    /// Insert the user or refresh their profile fields, bumping
    /// `last_activity_at` either way.
    pub async fn upsert_from_telegram(
        pool: &PgPool,
        input: &UpsertUser,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (telegram_id, username, first_name, last_name, language_code) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (telegram_id) DO UPDATE SET \
                 username = EXCLUDED.username, \
                 first_name = EXCLUDED.first_name, \
                 last_name = EXCLUDED.last_name, \
                 language_code = EXCLUDED.language_code, \
                 last_activity_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(input.telegram_id)
            .bind(&input.username)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.language_code)
            .fetch_one(pool)
            .await
    }

    /// Find a user by platform id.
    pub async fn find_by_telegram_id(
        pool: &PgPool,
        telegram_id: i64,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE telegram_id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(telegram_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Number of known users.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await
    }
}
