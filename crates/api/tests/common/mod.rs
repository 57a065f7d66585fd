use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use chrono::FixedOffset;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use autokarma_api::config::{BotConfig, BotMode, ServerConfig};
use autokarma_api::router::build_app_router;
use autokarma_api::state::AppState;
use autokarma_bot::Bot;
use autokarma_telegram::TelegramApi;

pub const TEST_TOKEN: &str = "123:TEST";

/// Nothing listens here; Telegram calls fail fast.
pub const UNREACHABLE_API_URL: &str = "http://127.0.0.1:9";

/// Build a test `ServerConfig` in webhook mode with a 30-second request timeout.
pub fn test_config(api_url: &str, webhook_secret: Option<&str>) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout_secs: 30,
        bot: BotConfig {
            token: TEST_TOKEN.to_string(),
            mode: BotMode::Webhook,
            webhook_url: Some("https://bot.example.com".to_string()),
            webhook_secret: webhook_secret.map(String::from),
            api_url: api_url.to_string(),
            poll_timeout_secs: 30,
            session_capacity: 100,
            utc_offset: FixedOffset::east_opt(3 * 3600).unwrap(),
        },
    }
}

/// Build the full application router against `api_url`, mirroring `main.rs`.
pub fn build_test_app_with(pool: PgPool, api_url: &str, webhook_secret: Option<&str>) -> Router {
    let config = test_config(api_url, webhook_secret);
    let telegram = TelegramApi::new(config.bot.api_url.clone(), config.bot.token.clone());
    let bot = Arc::new(Bot::new(
        telegram,
        pool.clone(),
        config.bot.utc_offset,
        config.bot.session_capacity,
    ));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        bot,
        bot_username: Some("autokarma_test_bot".to_string()),
    };

    build_app_router(state, &config)
}

/// Build the application with no webhook secret and an unreachable Bot API.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, UNREACHABLE_API_URL, None)
}

/// Send a GET request to `uri`.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST a JSON body to `uri` with optional extra headers.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
    headers: &[(&str, &str)],
) -> Response<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
