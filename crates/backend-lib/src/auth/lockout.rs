// ============================
// crates/backend-lib/src/auth/lockout.rs
// ============================
//! Failed-login counting and the lockout window.

use std::time::{Duration, SystemTime};

use super::session::SessionState;

/// Number of consecutive failed attempts that starts a lockout
pub const MAX_FAILED_ATTEMPTS: u32 = 3;

/// Length of the lockout window (1 minute)
pub const LOCKOUT_DURATION: Duration = Duration::from_secs(60);

/// Counter threshold and window applied to a session's failed logins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutPolicy {
    /// Failed attempts before the session is locked out
    pub max_failed_attempts: u32,
    /// How long a lockout lasts
    pub lockout_duration: Duration,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self::new(MAX_FAILED_ATTEMPTS, LOCKOUT_DURATION)
    }
}

impl LockoutPolicy {
    pub const fn new(max_failed_attempts: u32, lockout_duration: Duration) -> Self {
        Self {
            max_failed_attempts,
            lockout_duration,
        }
    }

    /// Record a failed attempt made at `now` while no lockout was active.
    ///
    /// Returns `true` when this failure started a lockout. The counter is
    /// reset whenever the window is set.
    pub fn record_failure(&self, session: &mut SessionState, now: SystemTime) -> bool {
        session.failed_attempts = session.failed_attempts.saturating_add(1);

        if session.failed_attempts >= self.max_failed_attempts {
            session.lockout_until = Some(now + self.lockout_duration);
            session.failed_attempts = 0;
            return true;
        }
        false
    }

    /// Clear all bookkeeping after a successful login
    pub fn record_success(&self, session: &mut SessionState) {
        session.failed_attempts = 0;
        session.lockout_until = None;
    }
}
