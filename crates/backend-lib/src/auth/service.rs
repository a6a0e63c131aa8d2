// =============
// crates/backend-lib/src/auth/service.rs
// =============
//! This module defines the `AuthService` trait, the login flow seen by the handlers.
use super::session::SessionState;
use crate::error::AppError;
use async_trait::async_trait;
use portal_common::UserId;
use std::time::Duration;

/// Result of a login attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    /// A lockout window is active; nothing was checked
    Locked { retry_after: Duration },
    /// Credentials matched this account
    Success(UserId),
    /// Credentials did not match; the failure was counted
    Invalid,
}

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Run one login attempt against `session`.
    ///
    /// The session is only mutated once the credential lookup has completed,
    /// so a datastore failure leaves it exactly as it was.
    async fn attempt_login(
        &self,
        session: &mut SessionState,
        username: &str,
        password: &str,
    ) -> Result<LoginOutcome, AppError>;
}
