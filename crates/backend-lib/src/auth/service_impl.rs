use super::{
    lockout::LockoutPolicy,
    service::{AuthService, LoginOutcome},
    session::SessionState,
};
use crate::{error::AppError, storage::Storage, telemetry, validation::neutralize};
use async_trait::async_trait;
use metrics::counter;
use std::{sync::Arc, time::SystemTime};
use tracing::{info, instrument, warn};

/// Login flow backed by the credential store
pub struct DefaultAuth {
    storage: Arc<dyn Storage>,
    policy: LockoutPolicy,
}

impl DefaultAuth {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self::new_with_policy(storage, LockoutPolicy::default())
    }

    pub fn new_with_policy(storage: Arc<dyn Storage>, policy: LockoutPolicy) -> Self {
        Self { storage, policy }
    }

    /// Same as [`AuthService::attempt_login`] with an explicit clock reading
    #[instrument(skip_all, fields(username = %username))]
    pub async fn attempt_login_at(
        &self,
        session: &mut SessionState,
        username: &str,
        password: &str,
        now: SystemTime,
    ) -> Result<LoginOutcome, AppError> {
        // Locked sessions never reach the credential store.
        if let Some(retry_after) = session.lockout_remaining(now) {
            counter!(telemetry::LOGIN_LOCKED).increment(1);
            info!(retry_after_secs = retry_after.as_secs(), "login refused, lockout active");
            return Ok(LoginOutcome::Locked { retry_after });
        }

        let username = neutralize(username);
        let password = neutralize(password);
        let account = self
            .storage
            .find_by_credentials(&username, &password)
            .await?;

        match account {
            Some(account) => {
                session.authenticated_user = Some(account.id);
                self.policy.record_success(session);
                counter!(telemetry::LOGIN_SUCCESS).increment(1);
                info!(user_id = %account.id, "login succeeded");
                Ok(LoginOutcome::Success(account.id))
            },
            None => {
                counter!(telemetry::LOGIN_FAILURE).increment(1);
                if self.policy.record_failure(session, now) {
                    counter!(telemetry::LOGIN_LOCKOUT_STARTED).increment(1);
                    warn!(
                        lockout_secs = self.policy.lockout_duration.as_secs(),
                        "too many failed logins, session locked out"
                    );
                }
                Ok(LoginOutcome::Invalid)
            },
        }
    }
}

#[async_trait]
impl AuthService for DefaultAuth {
    async fn attempt_login(
        &self,
        session: &mut SessionState,
        username: &str,
        password: &str,
    ) -> Result<LoginOutcome, AppError> {
        self.attempt_login_at(session, username, password, SystemTime::now())
            .await
    }
}
