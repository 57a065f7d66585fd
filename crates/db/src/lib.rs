//! PostgreSQL persistence for plate karma.
//!
//! - [`models`]: `FromRow` row structs and DTOs
//! - [`repositories`]: zero-sized repos with async query methods taking `&PgPool`
//! - [`store::PgKarmaStore`]: the ledger's [`KarmaStore`](autokarma_core::ledger::KarmaStore)
//! - [`seed`]: demo data for local development

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;
pub mod seed;
pub mod store;

pub use store::PgKarmaStore;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
