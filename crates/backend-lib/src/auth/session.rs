// ============================
// crates/backend-lib/src/auth/session.rs
// ============================
//! Server-side session state and the token-keyed store that holds it.
use async_trait::async_trait;
use dashmap::DashMap;
use metrics::{counter, gauge};
use portal_common::UserId;
use serde::{Deserialize, Serialize};
use std::{
    sync::Arc,
    time::{Duration, Instant, SystemTime},
};
use tracing::debug;

use super::token_generator::generate_secure_token;
use crate::telemetry;

/// Absolute session lifetime (24 hours)
pub const SESSION_ABSOLUTE_TTL: Duration = Duration::from_secs(60 * 60 * 24);

/// Idle session lifetime (30 minutes)
pub const SESSION_IDLE_TTL: Duration = Duration::from_secs(30 * 60);

/// Per-client authentication state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Signed-in account, `None` for an anonymous client
    pub authenticated_user: Option<UserId>,
    /// Consecutive failed logins since the last lockout or success
    pub failed_attempts: u32,
    /// Logins are refused until this instant
    pub lockout_until: Option<SystemTime>,
    /// One-shot notice shown on the next rendered page
    pub flash: Option<String>,
}

impl SessionState {
    /// Time left in the lockout window, `None` when no lockout is active
    pub fn lockout_remaining(&self, now: SystemTime) -> Option<Duration> {
        self.lockout_until
            .and_then(|until| until.duration_since(now).ok())
            .filter(|remaining| !remaining.is_zero())
    }

    pub fn is_locked(&self, now: SystemTime) -> bool {
        self.lockout_remaining(now).is_some()
    }

    /// Forget the signed-in account. Lockout bookkeeping is kept.
    pub fn logout(&mut self) {
        self.authenticated_user = None;
    }

    pub fn take_flash(&mut self) -> Option<String> {
        self.flash.take()
    }
}

/// Get/set-by-token session backend
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the state for `token`, `None` if unknown or expired
    async fn load(&self, token: &str) -> Option<SessionState>;

    /// Store the state for `token`, creating the session if needed
    async fn save(&self, token: &str, state: SessionState);

    /// Drop the session for `token`
    async fn remove(&self, token: &str);

    /// Purge expired sessions, returning how many were removed
    async fn cleanup_expired(&self) -> usize;

    /// Mint a token that is not yet in use
    fn new_token(&self) -> String {
        generate_secure_token()
    }
}

#[derive(Debug, Clone)]
struct SessionEntry {
    state: SessionState,
    created_at: Instant,
    last_active: Instant,
}

/// In-memory session store
#[derive(Debug, Clone)]
pub struct MemorySessionStore {
    sessions: Arc<DashMap<String, SessionEntry>>,
    absolute_ttl: Duration,
    idle_ttl: Duration,
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new(SESSION_ABSOLUTE_TTL, SESSION_IDLE_TTL)
    }
}

impl MemorySessionStore {
    /// Create a store with custom timeouts
    pub fn new(absolute_ttl: Duration, idle_ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            absolute_ttl,
            idle_ttl,
        }
    }

    /// Number of live sessions, expired ones included until the next cleanup
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn is_expired(&self, entry: &SessionEntry, now: Instant) -> bool {
        now.duration_since(entry.created_at) >= self.absolute_ttl
            || now.duration_since(entry.last_active) >= self.idle_ttl
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, token: &str) -> Option<SessionState> {
        let now = Instant::now();
        let mut entry = self.sessions.get_mut(token)?;
        if self.is_expired(&entry, now) {
            drop(entry);
            self.sessions.remove(token);
            counter!(telemetry::SESSION_EXPIRED).increment(1);
            debug!("session expired on access");
            return None;
        }
        entry.last_active = now;
        Some(entry.state.clone())
    }

    async fn save(&self, token: &str, state: SessionState) {
        let now = Instant::now();
        let mut created = false;
        self.sessions
            .entry(token.to_string())
            .and_modify(|entry| {
                entry.state = state.clone();
                entry.last_active = now;
            })
            .or_insert_with(|| {
                created = true;
                SessionEntry {
                    state,
                    created_at: now,
                    last_active: now,
                }
            });

        if created {
            counter!(telemetry::SESSION_CREATED).increment(1);
            gauge!(telemetry::SESSION_ACTIVE).set(self.sessions.len() as f64);
        }
    }

    async fn remove(&self, token: &str) {
        self.sessions.remove(token);
        gauge!(telemetry::SESSION_ACTIVE).set(self.sessions.len() as f64);
    }

    async fn cleanup_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.sessions.len();
        self.sessions.retain(|_, entry| !self.is_expired(entry, now));
        let removed = before.saturating_sub(self.sessions.len());

        if removed > 0 {
            counter!(telemetry::SESSION_EXPIRED).increment(removed as u64);
            gauge!(telemetry::SESSION_ACTIVE).set(self.sessions.len() as f64);
        }
        removed
    }
}
