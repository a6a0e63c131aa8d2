//! Guestbook.
use super::{chrome, found};
use crate::{
    error::AppError,
    middleware::SessionHandle,
    telemetry,
    validation::validate_comment,
    views::{render, CommentsPage},
    AppState,
};
use axum::{extract::State, response::Response, Extension, Form};
use metrics::counter;
use portal_common::CommentForm;

pub async fn list_comments(
    State(state): State<AppState>,
    Extension(handle): Extension<SessionHandle>,
) -> Result<Response, AppError> {
    let comments = state.storage.list_comments().await?;
    Ok(render(&CommentsPage {
        chrome: chrome(&state, &handle).await,
        comments,
    }))
}

/// Store a guestbook entry as-is; it is escaped when rendered
pub async fn post_comment(
    State(state): State<AppState>,
    Form(form): Form<CommentForm>,
) -> Result<Response, AppError> {
    let comment = validate_comment(form)?;
    state
        .storage
        .add_comment(&comment.username, &comment.text)
        .await?;
    counter!(telemetry::COMMENT_POSTED).increment(1);
    Ok(found("/comments"))
}
