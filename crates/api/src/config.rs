use chrono::{FixedOffset, Local, Offset};

use autokarma_bot::polling::DEFAULT_POLL_TIMEOUT_SECS;
use autokarma_telegram::api::DEFAULT_API_URL;

/// How updates reach the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotMode {
    /// Long polling with `getUpdates`.
    Polling,
    /// Telegram pushes updates to `POST /webhook`.
    Webhook,
}

impl BotMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "polling" => Some(Self::Polling),
            "webhook" => Some(Self::Webhook),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Polling => "polling",
            Self::Webhook => "webhook",
        }
    }
}

/// Telegram bot configuration.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Bot API token. Never logged.
    pub token: String,
    pub mode: BotMode,
    /// Public base URL; `/webhook` is appended when registering.
    pub webhook_url: Option<String>,
    /// Expected `X-Telegram-Bot-Api-Secret-Token` value on webhook calls.
    pub webhook_secret: Option<String>,
    /// Bot API base URL (default: `https://api.telegram.org`).
    pub api_url: String,
    /// Long-poll wait in seconds (default: `30`).
    pub poll_timeout_secs: u64,
    /// Maximum number of in-memory conversation sessions (default: `10000`).
    pub session_capacity: usize,
    /// Offset whose calendar days bound the daily rating limit.
    pub utc_offset: FixedOffset,
}

/// Server configuration loaded from environment variables.
///
/// All fields except the bot token have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub bot: BotConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                      |
    /// |----------------------------|------------------------------|
    /// | `HOST`                     | `0.0.0.0`                    |
    /// | `PORT`                     | `3000`                       |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                         |
    /// | `BOT_TOKEN`                | required                     |
    /// | `BOT_MODE`                 | `polling`                    |
    /// | `WEBHOOK_URL`              | required for `webhook` mode  |
    /// | `WEBHOOK_SECRET`           | unset                        |
    /// | `TELEGRAM_API_URL`         | `https://api.telegram.org`   |
    /// | `POLL_TIMEOUT_SECS`        | `30`                         |
    /// | `SESSION_CAPACITY`         | `10000`                      |
    /// | `KARMA_UTC_OFFSET_MINUTES` | host's local offset          |
    ///
    /// Panics on invalid values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            request_timeout_secs,
            bot: BotConfig::from_env(),
        }
    }
}

impl BotConfig {
    /// Load the bot section. See [`ServerConfig::from_env`] for the variables.
    pub fn from_env() -> Self {
        let token = std::env::var("BOT_TOKEN").expect("BOT_TOKEN must be set");

        let mode = std::env::var("BOT_MODE")
            .map(|v| BotMode::parse(&v).expect("BOT_MODE must be `polling` or `webhook`"))
            .unwrap_or(BotMode::Polling);

        let webhook_url = non_empty_var("WEBHOOK_URL");
        if mode == BotMode::Webhook && webhook_url.is_none() {
            panic!("WEBHOOK_URL must be set when BOT_MODE=webhook");
        }

        let api_url =
            std::env::var("TELEGRAM_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());

        let poll_timeout_secs: u64 = std::env::var("POLL_TIMEOUT_SECS")
            .map(|v| v.parse().expect("POLL_TIMEOUT_SECS must be a valid u64"))
            .unwrap_or(DEFAULT_POLL_TIMEOUT_SECS);

        let session_capacity: usize = std::env::var("SESSION_CAPACITY")
            .unwrap_or_else(|_| "10000".into())
            .parse()
            .expect("SESSION_CAPACITY must be a valid usize");

        Self {
            token,
            mode,
            webhook_url,
            webhook_secret: non_empty_var("WEBHOOK_SECRET"),
            api_url,
            poll_timeout_secs,
            session_capacity,
            utc_offset: utc_offset_from_env(),
        }
    }

    /// Full URL Telegram should deliver updates to.
    pub fn webhook_endpoint(&self) -> Option<String> {
        self.webhook_url
            .as_deref()
            .map(|base| format!("{}/webhook", base.trim_end_matches('/')))
    }
}

/// `KARMA_UTC_OFFSET_MINUTES`, or the host's current local offset.
///
/// Also used by the seed binary.
pub fn utc_offset_from_env() -> FixedOffset {
    match std::env::var("KARMA_UTC_OFFSET_MINUTES") {
        Ok(v) => parse_utc_offset_minutes(&v)
            .expect("KARMA_UTC_OFFSET_MINUTES must be whole minutes within +/-24h"),
        Err(_) => Local::now().offset().fix(),
    }
}

/// Parse a signed number of minutes east of UTC, e.g. `180` for Moscow.
pub fn parse_utc_offset_minutes(s: &str) -> Option<FixedOffset> {
    let minutes: i32 = s.trim().parse().ok()?;
    FixedOffset::east_opt(minutes.checked_mul(60)?)
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
