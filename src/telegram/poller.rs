//! Long-polling update listener.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use super::api::TelegramApi;
use super::types::Update;

/// Seconds Telegram holds a getUpdates request open.
pub const POLL_TIMEOUT_SECS: u64 = 30;

/// Pause after a failed poll before trying again.
const ERROR_BACKOFF: Duration = Duration::from_secs(5);

/// Spawn the getUpdates loop.
///
/// Updates are forwarded in arrival order. The loop ends when `shutdown`
/// flips to `true` or the receiver is dropped.
pub fn spawn_poller(
    api: TelegramApi,
    mut shutdown: watch::Receiver<bool>,
) -> (JoinHandle<()>, mpsc::UnboundedReceiver<Update>) {
    let (tx, rx) = mpsc::unbounded_channel();

    let handle = tokio::spawn(async move {
        let mut offset: i64 = 0;

        tracing::info!("Telegram channel listening for messages...");

        loop {
            if *shutdown.borrow() {
                break;
            }

            let polled = tokio::select! {
                result = api.get_updates(offset, POLL_TIMEOUT_SECS) => result,
                _ = shutdown.changed() => break,
            };

            let updates = match polled {
                Ok(updates) => updates,
                Err(e) => {
                    tracing::warn!("Telegram poll error: {e}");
                    tokio::select! {
                        _ = tokio::time::sleep(ERROR_BACKOFF) => continue,
                        _ = shutdown.changed() => break,
                    }
                }
            };

            for update in updates {
                offset = next_offset(offset, &update);
                if tx.send(update).is_err() {
                    tracing::info!("Update receiver dropped, stopping poller");
                    return;
                }
            }
        }

        tracing::info!("Telegram poller stopped");
    });

    (handle, rx)
}

/// Acknowledge everything up to and including `update`.
fn next_offset(current: i64, update: &Update) -> i64 {
    current.max(update.update_id + 1)
}
