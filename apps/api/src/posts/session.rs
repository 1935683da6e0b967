//! Per-session state: generation counter, login flag and post history.
//!
//! Sessions live only in memory. They are created on demand, mutated by the
//! composer, and discarded when the client deletes them or when they sit idle
//! past the configured TTL.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::post::HistoryEntry;

/// Posts an anonymous session may generate before it must log in.
pub const FREE_GENERATION_LIMIT: u32 = 10;

#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub generation_count: u32,
    pub logged_in: bool,
    /// Newest first.
    pub history: Vec<HistoryEntry>,
    #[serde(skip)]
    last_active: Instant,
}

impl Session {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            generation_count: 0,
            logged_in: false,
            history: Vec::new(),
            last_active: Instant::now(),
        }
    }

    fn touch(&mut self) {
        self.last_active = Instant::now();
    }

    /// Free generations left; `None` once logged in (no limit).
    pub fn remaining_free(&self) -> Option<u32> {
        if self.logged_in {
            None
        } else {
            Some(FREE_GENERATION_LIMIT.saturating_sub(self.generation_count))
        }
    }
}

/// Session snapshot without the history, returned by create/lookup.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub generation_count: u32,
    pub logged_in: bool,
    pub remaining_free: Option<u32>,
    pub history_len: usize,
}

impl From<&Session> for SessionSummary {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id,
            created_at: session.created_at,
            generation_count: session.generation_count,
            logged_in: session.logged_in,
            remaining_free: session.remaining_free(),
            history_len: session.history.len(),
        }
    }
}

/// Counter state handed back when a generation slot is claimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationSlot {
    pub generation_count: u32,
    pub remaining_free: Option<u32>,
}

/// In-memory session table. The lock is only held for bookkeeping, never
/// across provider calls.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> SessionSummary {
        let session = Session::new();
        let summary = SessionSummary::from(&session);
        self.sessions.write().await.insert(session.id, session);
        summary
    }

    pub async fn summary(&self, id: Uuid) -> Result<SessionSummary, AppError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or_else(|| session_not_found(id))?;
        session.touch();
        Ok(SessionSummary::from(&*session))
    }

    pub async fn history(&self, id: Uuid) -> Result<Vec<HistoryEntry>, AppError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or_else(|| session_not_found(id))?;
        session.touch();
        Ok(session.history.clone())
    }

    /// Checks the free quota and, for anonymous sessions, counts the
    /// generation up front so concurrent requests cannot overrun the limit.
    pub async fn claim_generation(&self, id: Uuid) -> Result<GenerationSlot, AppError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or_else(|| session_not_found(id))?;
        session.touch();

        if !session.logged_in {
            if session.generation_count >= FREE_GENERATION_LIMIT {
                return Err(AppError::QuotaExceeded {
                    limit: FREE_GENERATION_LIMIT,
                });
            }
            session.generation_count += 1;
        }

        Ok(GenerationSlot {
            generation_count: session.generation_count,
            remaining_free: session.remaining_free(),
        })
    }

    /// Prepends a finished post to the session's history.
    pub async fn record(&self, id: Uuid, entry: HistoryEntry) -> Result<(), AppError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or_else(|| session_not_found(id))?;
        session.history.insert(0, entry);
        session.touch();
        Ok(())
    }

    /// Drops every session untouched for longer than `max_idle`; returns how
    /// many were removed.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.last_active.elapsed() <= max_idle);
        before - sessions.len()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| session_not_found(id))
    }

    #[cfg(test)]
    pub(crate) async fn set_logged_in(&self, id: Uuid, logged_in: bool) {
        if let Some(session) = self.sessions.write().await.get_mut(&id) {
            session.logged_in = logged_in;
        }
    }
}

/// Runs `evict_idle` every `every` for the life of the process.
pub fn spawn_idle_sweeper(
    store: Arc<SessionStore>,
    max_idle: Duration,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            let evicted = store.evict_idle(max_idle).await;
            if evicted > 0 {
                let remaining = store.session_count().await;
                info!(evicted, remaining, "evicted idle sessions");
            }
        }
    })
}

fn session_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}
