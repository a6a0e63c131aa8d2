// ============================
// crates/backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.
pub mod gate;
pub mod lockout;
mod service;
mod service_impl;
pub mod session;
pub mod token_generator;

pub use gate::authorize_view;
pub use lockout::{LockoutPolicy, LOCKOUT_DURATION, MAX_FAILED_ATTEMPTS};
pub use service::{AuthService, LoginOutcome};
pub use service_impl::DefaultAuth;
pub use session::{
    MemorySessionStore, SessionState, SessionStore, SESSION_ABSOLUTE_TTL, SESSION_IDLE_TTL,
};
