use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use autokarma_api::config::{BotMode, ServerConfig};
use autokarma_api::router::build_app_router;
use autokarma_api::state::AppState;
use autokarma_bot::{polling, Bot};
use autokarma_telegram::TelegramApi;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "autokarma_api=debug,autokarma_bot=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        mode = config.bot.mode.as_str(),
        utc_offset = %config.bot.utc_offset,
        "Loaded server configuration"
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = autokarma_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    autokarma_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    autokarma_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Telegram ---
    let telegram = TelegramApi::new(config.bot.api_url.clone(), config.bot.token.clone());
    let me = telegram
        .get_me()
        .await
        .expect("Failed to reach the Telegram Bot API; check BOT_TOKEN");
    tracing::info!(username = ?me.username, bot_id = me.id, "Authenticated with Telegram");

    let bot = Arc::new(Bot::new(
        telegram,
        pool.clone(),
        config.bot.utc_offset,
        config.bot.session_capacity,
    ));

    // --- Update delivery ---
    let polling_cancel = CancellationToken::new();
    let polling_handle = match config.bot.mode {
        BotMode::Polling => {
            let bot = Arc::clone(&bot);
            let timeout_secs = config.bot.poll_timeout_secs;
            let cancel = polling_cancel.clone();
            Some(tokio::spawn(async move {
                polling::run(bot, timeout_secs, cancel).await;
            }))
        }
        BotMode::Webhook => {
            let endpoint = config
                .bot
                .webhook_endpoint()
                .expect("WEBHOOK_URL must be set when BOT_MODE=webhook");
            bot.chat()
                .set_webhook(&endpoint, config.bot.webhook_secret.as_deref())
                .await
                .expect("Failed to register webhook");
            tracing::info!(%endpoint, "Webhook registered");
            None
        }
    };

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        bot,
        bot_username: me.username,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    polling_cancel.cancel();
    if let Some(handle) = polling_handle {
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
        tracing::info!("Polling loop stopped");
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
