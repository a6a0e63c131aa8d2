// crates/backend-lib/src/middleware/mod.rs

//! Middleware for the portal server.

pub mod session;

pub use session::{session_layer, SessionHandle, SESSION_COOKIE_NAME};
