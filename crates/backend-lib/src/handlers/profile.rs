//! Profile pages.
use super::{chrome, found};
use crate::{
    auth::authorize_view,
    error::AppError,
    middleware::SessionHandle,
    views::{render, ProfilePage},
    AppState,
};
use axum::{
    extract::{Path, State},
    response::Response,
    Extension,
};
use portal_common::UserId;
use tracing::warn;

/// Show the profile of `user_id` to its owner.
///
/// Anonymous sessions are sent to the login page; a signed-in session
/// asking for someone else's profile gets `403`. Data is always loaded
/// with the session's identity, never the path's.
pub async fn profile(
    State(state): State<AppState>,
    Extension(handle): Extension<SessionHandle>,
    Path(user_id): Path<i64>,
) -> Result<Response, AppError> {
    let requested = UserId(user_id);
    let Some(current) = handle.state.authenticated_user else {
        return Ok(found("/login"));
    };

    if !authorize_view(&handle.state, requested) {
        warn!(%current, %requested, "profile access denied");
        return Err(AppError::Forbidden(
            "You are not allowed to view this profile.".to_string(),
        ));
    }

    let Some(user) = state.storage.find_user(current).await? else {
        return Err(AppError::Forbidden(
            "User not found or unauthorized access.".to_string(),
        ));
    };
    let cards = state.storage.list_cards(current).await?;

    Ok(render(&ProfilePage {
        chrome: chrome(&state, &handle).await,
        user,
        cards,
    }))
}

/// Send a signed-in session to its own profile
pub async fn own_profile(Extension(handle): Extension<SessionHandle>) -> Response {
    match handle.state.authenticated_user {
        Some(id) => found(&format!("/profile/{id}")),
        None => found("/login"),
    }
}
