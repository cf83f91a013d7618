use crate::config::Config;
use crate::db::DbPool;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use uuid::Uuid;

struct SessionEntry {
    user_id: i64,
    issued_at: Instant,
}

/// Server-side session store mapping bearer tokens to user ids. Tokens older
/// than the configured lifetime are rejected and swept on the next issue.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<String, SessionEntry>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::default(),
            ttl,
        }
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<String, SessionEntry>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Issue a fresh random token for `user_id`.
    pub fn create(&self, user_id: i64) -> String {
        let token = Uuid::new_v4().to_string();
        let mut sessions = self.sessions();

        let before = sessions.len();
        sessions.retain(|_, entry| entry.issued_at.elapsed() < self.ttl);
        let expired = before - sessions.len();
        if expired > 0 {
            tracing::debug!(expired, "Swept expired sessions");
        }

        sessions.insert(
            token.clone(),
            SessionEntry {
                user_id,
                issued_at: Instant::now(),
            },
        );
        token
    }

    pub fn user_id(&self, token: &str) -> Option<i64> {
        let mut sessions = self.sessions();
        let entry = sessions.get(token)?;
        if entry.issued_at.elapsed() < self.ttl {
            return Some(entry.user_id);
        }
        sessions.remove(token);
        None
    }

    pub fn revoke(&self, token: &str) -> bool {
        self.sessions().remove(token).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Arc<Config>,
    pub sessions: SessionStore,
    /// Outbound client for Google sign-in and the AI assistant.
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(db: DbPool, config: Config) -> Self {
        Self {
            db,
            sessions: SessionStore::new(config.session_ttl),
            config: Arc::new(config),
            http: reqwest::Client::new(),
        }
    }
}
