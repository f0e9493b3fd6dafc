use std::{
    collections::HashMap,
    sync::{Arc, Weak},
    time::Duration as StdDuration,
};

use chrono::{DateTime, Duration, Utc};
use tokio::{sync::RwLock, task::JoinHandle};

use crate::{error::AppResult, models::SessionData};

/// Per-session key-value storage for user selections
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// Loads a live session, `None` if unknown or expired
    async fn get(&self, id: &str) -> AppResult<Option<SessionData>>;

    /// Stores a session and restarts its TTL
    async fn set(&self, id: &str, data: &SessionData) -> AppResult<()>;

    /// Removes a session immediately
    async fn expire(&self, id: &str) -> AppResult<()>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

struct Entry {
    data: SessionData,
    expires_at: DateTime<Utc>,
}

/// Process-local session store
#[derive(Clone)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, Entry>>>,
    ttl: Duration,
}

impl InMemorySessionStore {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl: Duration::seconds(ttl_secs as i64),
        }
    }

    /// Drops every expired session
    pub async fn purge_expired(&self) -> usize {
        purge(&self.sessions).await
    }

    /// Spawns a task that purges expired sessions every `period`.
    ///
    /// The task holds a weak reference and exits once the store is dropped.
    /// Must be called from within a tokio runtime.
    pub fn spawn_reaper(&self, period: StdDuration) -> JoinHandle<()> {
        let sessions: Weak<RwLock<HashMap<String, Entry>>> = Arc::downgrade(&self.sessions);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // First tick completes immediately
            interval.tick().await;

            loop {
                interval.tick().await;
                let Some(sessions) = sessions.upgrade() else {
                    break;
                };

                let purged = purge(&sessions).await;
                if purged > 0 {
                    tracing::debug!(purged, "Purged expired sessions");
                }
            }
        })
    }
}

async fn purge(sessions: &RwLock<HashMap<String, Entry>>) -> usize {
    let now = Utc::now();
    let mut sessions = sessions.write().await;
    let before = sessions.len();
    sessions.retain(|_, entry| entry.expires_at > now);
    before - sessions.len()
}

#[async_trait::async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, id: &str) -> AppResult<Option<SessionData>> {
        let now = Utc::now();
        {
            let sessions = self.sessions.read().await;
            match sessions.get(id) {
                Some(entry) if entry.expires_at > now => return Ok(Some(entry.data.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }

        // Expired: remove it so the map does not grow with dead sessions
        self.sessions.write().await.remove(id);
        Ok(None)
    }

    async fn set(&self, id: &str, data: &SessionData) -> AppResult<()> {
        let entry = Entry {
            data: data.clone(),
            expires_at: Utc::now() + self.ttl,
        };
        self.sessions.write().await.insert(id.to_string(), entry);
        Ok(())
    }

    async fn expire(&self, id: &str) -> AppResult<()> {
        self.sessions.write().await.remove(id);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
