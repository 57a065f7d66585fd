//! Long-polling delivery.
//!
//! Fetches updates with `getUpdates`, handles them one at a time in
//! arrival order and acknowledges them through the next request's offset.
//! Runs until `cancel` is triggered.

use std::sync::Arc;
use std::time::Duration;

use autokarma_telegram::TelegramApi;
use tokio_util::sync::CancellationToken;

use crate::bot::Bot;

/// Default server-side wait for new updates.
pub const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;

/// Pause after a failed `getUpdates` call.
const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Run the polling loop.
pub async fn run(bot: Arc<Bot<TelegramApi>>, timeout_secs: u64, cancel: CancellationToken) {
    // getUpdates is refused while a webhook is registered.
    if let Err(e) = bot.chat().delete_webhook().await {
        tracing::warn!(error = %e, "Could not remove webhook before polling");
    }

    tracing::info!(timeout_secs, "Polling for updates");

    let mut offset: Option<i64> = None;

    loop {
        let updates = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Polling stopped");
                break;
            }
            result = bot.chat().get_updates(offset, timeout_secs) => result,
        };

        match updates {
            Ok(updates) => {
                if !updates.is_empty() {
                    tracing::debug!(count = updates.len(), "Received updates");
                }
                for update in updates {
                    offset = Some(next_offset(offset, update.update_id));
                    bot.handle_update(update).await;
                }
            }
            Err(e) => {
                tracing::error!(error = %e, retry_in_secs = RETRY_DELAY.as_secs(), "getUpdates failed");
                tokio::select! {
                    _ = cancel.cancelled() => {
                        tracing::info!("Polling stopped");
                        break;
                    }
                    _ = tokio::time::sleep(RETRY_DELAY) => {}
                }
            }
        }
    }
}

/// Offset acknowledging `update_id`, never moving backwards.
fn next_offset(current: Option<i64>, update_id: i64) -> i64 {
    let next = update_id + 1;
    current.map_or(next, |c| c.max(next))
}
