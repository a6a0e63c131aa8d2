// ============================
// crates/backend-lib/src/lib.rs
// ============================
//! Core of the demo portal: login with per-session lockout, session-gated
//! profiles and the surrounding content pages.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod storage;
pub mod telemetry;
pub mod validation;
pub mod views;

use crate::auth::{AuthService, DefaultAuth, MemorySessionStore, SessionStore};
use crate::config::Settings;
use crate::storage::{SqliteStorage, Storage};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Login flow
    pub auth: Arc<dyn AuthService>,
    /// Session store
    pub sessions: Arc<dyn SessionStore>,
    /// Credential and content store
    pub storage: Arc<dyn Storage>,
    /// Settings
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Create a new application state around existing backends
    pub fn new(
        storage: Arc<dyn Storage>,
        sessions: Arc<dyn SessionStore>,
        settings: Settings,
    ) -> Self {
        let auth = Arc::new(DefaultAuth::new(storage.clone()));
        Self {
            auth,
            sessions,
            storage,
            settings: Arc::new(settings),
        }
    }

    /// Connect the SQLite store and an in-memory session store from settings
    pub async fn from_settings(settings: Settings) -> anyhow::Result<Self> {
        let storage =
            SqliteStorage::connect(&settings.database_url, settings.max_db_connections).await?;
        let sessions = MemorySessionStore::new(
            settings.session.absolute_ttl(),
            settings.session.idle_ttl(),
        );
        Ok(Self::new(Arc::new(storage), Arc::new(sessions), settings))
    }
}
