//! Per-user update lanes.
//!
//! Each user gets a task fed by its own queue, so different users progress
//! concurrently while one user's messages are handled strictly in arrival
//! order. Lanes exit after sitting idle and are respawned on demand.

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::FutureExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::channel::{Messenger, OutgoingReply};
use crate::dispatch::{Dispatcher, InboundEvent};
use crate::i18n::{self, Language, MessageKey};
use crate::telegram::Update;

/// How long a lane waits for more work before exiting.
pub const LANE_IDLE_TIMEOUT: Duration = Duration::from_secs(300);

/// Processes one update to completion.
#[async_trait]
pub trait LaneHandler: Send + Sync + 'static {
    async fn handle(&self, update: Update);
}

struct Lane {
    tx: mpsc::UnboundedSender<Update>,
    task: JoinHandle<()>,
}

/// Fans updates out to per-user lanes.
pub struct UpdateLanes<H: LaneHandler> {
    handler: Arc<H>,
    idle_timeout: Duration,
    lanes: HashMap<i64, Lane>,
}

impl<H: LaneHandler> UpdateLanes<H> {
    pub fn new(handler: Arc<H>) -> Self {
        Self::with_idle_timeout(handler, LANE_IDLE_TIMEOUT)
    }

    pub fn with_idle_timeout(handler: Arc<H>, idle_timeout: Duration) -> Self {
        Self {
            handler,
            idle_timeout,
            lanes: HashMap::new(),
        }
    }

    /// Consume updates until the source closes, then let every lane drain.
    pub async fn run(mut self, mut updates: mpsc::UnboundedReceiver<Update>) {
        while let Some(update) = updates.recv().await {
            self.route(update);
        }

        info!(lanes = self.lanes.len(), "Update source closed; draining lanes");
        let tasks: Vec<JoinHandle<()>> = self.lanes.drain().map(|(_, lane)| lane.task).collect();
        for task in tasks {
            if let Err(e) = task.await {
                error!(error = %e, "Lane task failed");
            }
        }
    }

    fn route(&mut self, update: Update) {
        let key = lane_key(&update);

        let (update, previous) = match self.lanes.remove(&key) {
            Some(lane) => match lane.tx.send(update) {
                Ok(()) => {
                    self.lanes.insert(key, lane);
                    return;
                }
                // The lane went idle and closed its queue; hand over to a new
                // lane that starts once the old one has drained.
                Err(mpsc::error::SendError(update)) => (update, Some(lane.task)),
            },
            None => (update, None),
        };

        self.lanes.retain(|_, lane| !lane.task.is_finished());

        let (tx, rx) = mpsc::unbounded_channel();
        // A fresh receiver cannot be closed.
        let _ = tx.send(update);
        let task = tokio::spawn(lane_loop(
            key,
            rx,
            Arc::clone(&self.handler),
            self.idle_timeout,
            previous,
        ));
        debug!(key, live = self.lanes.len() + 1, "Lane spawned");
        self.lanes.insert(key, Lane { tx, task });
    }
}

async fn lane_loop<H: LaneHandler>(
    key: i64,
    mut rx: mpsc::UnboundedReceiver<Update>,
    handler: Arc<H>,
    idle_timeout: Duration,
    previous: Option<JoinHandle<()>>,
) {
    if let Some(previous) = previous {
        let _ = previous.await;
    }

    loop {
        match tokio::time::timeout(idle_timeout, rx.recv()).await {
            Ok(Some(update)) => handler.handle(update).await,
            Ok(None) => break,
            Err(_) => {
                // Refuse new work, then finish what was already queued.
                rx.close();
                while let Ok(update) = rx.try_recv() {
                    handler.handle(update).await;
                }
                break;
            }
        }
    }

    debug!(key, "Lane exited");
}

/// Users keep their own lane; sender-less updates share one per chat.
fn lane_key(update: &Update) -> i64 {
    update
        .message
        .as_ref()
        .map(|m| m.from.as_ref().map(|u| u.id).unwrap_or(m.chat.id))
        .unwrap_or(0)
}

/// Production handler: dispatch and deliver replies.
pub struct BotHandler {
    dispatcher: Arc<Dispatcher>,
    messenger: Arc<dyn Messenger>,
}

impl BotHandler {
    pub fn new(dispatcher: Arc<Dispatcher>, messenger: Arc<dyn Messenger>) -> Self {
        Self {
            dispatcher,
            messenger,
        }
    }
}

#[async_trait]
impl LaneHandler for BotHandler {
    async fn handle(&self, update: Update) {
        let Some(event) = update.message.as_ref().and_then(InboundEvent::from_message) else {
            debug!(update_id = update.update_id, "Skipping update without a sender");
            return;
        };

        let lang = Language::from_code(event.user.language_code.as_deref());
        let replies = match AssertUnwindSafe(self.dispatcher.dispatch(&event))
            .catch_unwind()
            .await
        {
            Ok(replies) => replies,
            Err(_) => {
                error!(
                    update_id = update.update_id,
                    user_id = event.user.id,
                    "Handler panicked"
                );
                vec![OutgoingReply::plain(i18n::message(lang, MessageKey::GenericError, &[]))]
            }
        };

        for reply in replies {
            if let Err(e) = self.messenger.send(&event.chat_id, &reply).await {
                warn!(chat_id = %event.chat_id, error = %e, "Failed to deliver reply");
            }
        }
    }
}
