//! Per-user dialogue sessions.
//!
//! A session exists exactly while a flow is in progress for a
//! `(user, flow kind)` pair. Nothing here outlives the process.

pub mod store;

pub use store::{MemorySessionStore, spawn_eviction_task};

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::conversation::{RegistrationState, SupportState};

/// Which dialogue a session belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowKind {
    Registration,
    Support,
}

impl std::fmt::Display for FlowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Registration => write!(f, "registration"),
            Self::Support => write!(f, "support"),
        }
    }
}

/// State of one in-progress dialogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    Registration(RegistrationState),
    Support(SupportState),
}

impl FlowState {
    pub fn kind(&self) -> FlowKind {
        match self {
            Self::Registration(_) => FlowKind::Registration,
            Self::Support(_) => FlowKind::Support,
        }
    }
}

/// Stored session with bookkeeping timestamps.
#[derive(Debug, Clone)]
pub struct SessionEntry {
    pub state: FlowState,
    pub started_at: DateTime<Utc>,
    pub touched_at: DateTime<Utc>,
}

/// Concurrency-safe session storage keyed by `(user id, flow kind)`.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, user_id: &str, kind: FlowKind) -> Option<FlowState>;

    /// Insert or replace the session for `state.kind()`.
    ///
    /// Replacing keeps the original start time unless `restart` is set.
    async fn put(&self, user_id: &str, state: FlowState, restart: bool);

    /// Remove a session, returning what was stored.
    async fn delete(&self, user_id: &str, kind: FlowKind) -> Option<FlowState>;

    /// The user's live flows, most recently started first.
    async fn active(&self, user_id: &str) -> Vec<FlowKind>;

    /// Drop sessions untouched for longer than `max_idle` as of `now`.
    /// Returns how many were removed.
    async fn evict_idle(&self, max_idle: Duration, now: DateTime<Utc>) -> usize;
}
