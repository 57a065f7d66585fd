use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response body.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    pub bot: BotHealth,
}

/// Which bot is running and how it receives updates.
#[derive(Serialize)]
pub struct BotHealth {
    pub mode: &'static str,
    pub username: Option<String>,
}

/// GET /health
///
/// Returns service health including database connectivity status.
/// Always returns 200 OK; callers should inspect `status` and `db_healthy`.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = autokarma_db::health_check(&state.pool).await.is_ok();

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        bot: BotHealth {
            mode: state.config.bot.mode.as_str(),
            username: state.bot_username.clone(),
        },
    })
}

/// Health check routes (mounted at root level, not under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
