// ============================
// crates/backend-lib/src/handlers/mod.rs
// ============================
//! HTTP handlers.
pub mod comments;
pub mod download;
pub mod login;
pub mod pages;
pub mod profile;

use crate::{middleware::SessionHandle, views::Chrome, AppState};
use axum::{
    http::{header::LOCATION, StatusCode},
    response::{IntoResponse, Response},
};

/// `302 Found` to an internal path
pub(crate) fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location)]).into_response()
}

/// Page chrome for the request's session, consuming any pending flash notice
pub(crate) async fn chrome(state: &AppState, handle: &SessionHandle) -> Chrome {
    let mut session = handle.state.clone();
    let flash = session.take_flash();
    if flash.is_some() {
        state.sessions.save(&handle.token, session.clone()).await;
    }
    Chrome {
        current_user: session.authenticated_user,
        flash,
    }
}
