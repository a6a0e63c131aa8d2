// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
use anyhow::{bail, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    time::Duration,
};

/// Default configuration file, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "portal.toml";

/// Environment variable prefix, nested keys are split on `__`
pub const ENV_PREFIX: &str = "PORTAL_";

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// sqlx connection URL of the credential store
    pub database_url: String,
    /// Connection pool size
    pub max_db_connections: u32,
    /// Directory served by `/download`
    pub docs_dir: PathBuf,
    /// Log level, overridden by `RUST_LOG`
    pub log_level: String,
    /// Emit JSON log lines
    pub log_json: bool,
    /// Session store settings
    pub session: SessionSettings,
}

/// Session lifetime and cookie settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Idle timeout in seconds
    pub idle_ttl_secs: u64,
    /// Absolute timeout in seconds
    pub absolute_ttl_secs: u64,
    /// Interval of the expired-session sweep in seconds
    pub cleanup_interval_secs: u64,
    /// Mark the session cookie `Secure`
    pub cookie_secure: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            database_url: "sqlite://portal.db?mode=rwc".to_string(),
            max_db_connections: 5,
            docs_dir: PathBuf::from("docs"),
            log_level: "info".to_string(),
            log_json: false,
            session: SessionSettings::default(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            idle_ttl_secs: 30 * 60,
            absolute_ttl_secs: 24 * 60 * 60,
            cleanup_interval_secs: 15 * 60,
            cookie_secure: false,
        }
    }
}

impl SessionSettings {
    pub fn idle_ttl(&self) -> Duration {
        Duration::from_secs(self.idle_ttl_secs)
    }

    pub fn absolute_ttl(&self) -> Duration {
        Duration::from_secs(self.absolute_ttl_secs)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }
}

impl Settings {
    /// Load settings from `portal.toml` (if present) and the environment
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load settings from a specific TOML file (if present) and the environment
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings: Settings = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            bail!("invalid log level: {}", self.log_level);
        }
        if self.database_url.trim().is_empty() {
            bail!("database_url must not be empty");
        }
        if self.max_db_connections == 0 {
            bail!("max_db_connections must be at least 1");
        }
        let session = &self.session;
        if session.idle_ttl_secs == 0 || session.absolute_ttl_secs == 0 {
            bail!("session TTLs must be greater than zero");
        }
        if session.idle_ttl_secs > session.absolute_ttl_secs {
            bail!("session idle TTL must not exceed the absolute TTL");
        }
        if session.cleanup_interval_secs == 0 {
            bail!("session cleanup interval must be greater than zero");
        }
        Ok(())
    }
}
