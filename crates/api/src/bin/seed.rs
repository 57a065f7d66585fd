//! Load demo plates and ratings into the database for local development.
//!
//! Clears all plates and karma actions first. Never point this at a
//! production database.

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use autokarma_api::config::utc_offset_from_env;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "autokarma_api=info,autokarma_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = autokarma_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    autokarma_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let utc_offset = utc_offset_from_env();
    let summary = autokarma_db::seed::seed_demo_data(&pool, utc_offset)
        .await
        .context("Failed to seed demo data")?;

    tracing::info!(
        users = summary.users,
        plates = summary.plates,
        actions = summary.actions,
        "Demo data loaded"
    );
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
