//! In-memory session store.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::{FlowKind, FlowState, SessionEntry, SessionStore};

/// How often the eviction sweep runs.
const EVICTION_INTERVAL: Duration = Duration::from_secs(60);

/// Sessions held in a `RwLock`ed map.
#[derive(Default)]
pub struct MemorySessionStore {
    entries: RwLock<HashMap<(String, FlowKind), SessionEntry>>,
}

impl MemorySessionStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Number of live sessions across all users.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, user_id: &str, kind: FlowKind) -> Option<FlowState> {
        let entries = self.entries.read().await;
        entries
            .get(&(user_id.to_string(), kind))
            .map(|e| e.state.clone())
    }

    async fn put(&self, user_id: &str, state: FlowState, restart: bool) {
        let now = Utc::now();
        let key = (user_id.to_string(), state.kind());
        let mut entries = self.entries.write().await;
        match entries.get_mut(&key) {
            Some(entry) => {
                if restart {
                    entry.started_at = now;
                }
                entry.state = state;
                entry.touched_at = now;
            }
            None => {
                debug!(user_id, kind = %key.1, "Session created");
                entries.insert(
                    key,
                    SessionEntry {
                        state,
                        started_at: now,
                        touched_at: now,
                    },
                );
            }
        }
    }

    async fn delete(&self, user_id: &str, kind: FlowKind) -> Option<FlowState> {
        let mut entries = self.entries.write().await;
        let removed = entries.remove(&(user_id.to_string(), kind));
        if removed.is_some() {
            debug!(user_id, %kind, "Session removed");
        }
        removed.map(|e| e.state)
    }

    async fn active(&self, user_id: &str) -> Vec<FlowKind> {
        let entries = self.entries.read().await;
        let mut live: Vec<(FlowKind, DateTime<Utc>)> = entries
            .iter()
            .filter(|((uid, _), _)| uid == user_id)
            .map(|((_, kind), e)| (*kind, e.started_at))
            .collect();
        live.sort_by(|a, b| b.1.cmp(&a.1));
        live.into_iter().map(|(kind, _)| kind).collect()
    }

    async fn evict_idle(&self, max_idle: Duration, now: DateTime<Utc>) -> usize {
        let Ok(max_idle) = chrono::Duration::from_std(max_idle) else {
            return 0;
        };
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, e| now - e.touched_at <= max_idle);
        let evicted = before - entries.len();
        if evicted > 0 {
            info!(evicted, remaining = entries.len(), "Evicted idle sessions");
        }
        evicted
    }
}

/// Spawn the periodic sweep that drops abandoned sessions.
pub fn spawn_eviction_task(
    store: Arc<dyn SessionStore>,
    idle_timeout: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(EVICTION_INTERVAL);
        loop {
            interval.tick().await;
            store.evict_idle(idle_timeout, Utc::now()).await;
        }
    })
}
