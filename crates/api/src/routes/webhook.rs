//! Telegram webhook delivery.
//!
//! Telegram retries a delivery until it gets a 2xx, so the update is
//! acknowledged immediately and processed on a spawned task.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use autokarma_telegram::Update;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Header carrying the secret registered with `setWebhook`.
pub const SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

/// POST /webhook
async fn receive_update(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<Update>, JsonRejection>,
) -> AppResult<StatusCode> {
    if let Some(expected) = state.config.bot.webhook_secret.as_deref() {
        let provided = headers.get(SECRET_HEADER).and_then(|v| v.to_str().ok());
        if provided != Some(expected) {
            tracing::warn!("Webhook call with wrong secret token");
            return Err(AppError::Unauthorized("Invalid secret token".into()));
        }
    }

    let Json(update) = body.map_err(|rejection| {
        tracing::warn!(error = %rejection, "Webhook body is not an update");
        AppError::BadRequest(rejection.body_text())
    })?;

    tracing::debug!(update_id = update.update_id, "Webhook update received");

    let bot = Arc::clone(&state.bot);
    tokio::spawn(async move {
        bot.handle_update(update).await;
    });

    Ok(StatusCode::OK)
}

pub fn router() -> Router<AppState> {
    Router::new().route("/webhook", post(receive_update))
}
