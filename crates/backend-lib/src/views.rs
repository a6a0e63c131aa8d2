//! HTML pages.
//!
//! All pages are askama templates with HTML auto-escaping, so every value
//! interpolated into a page is inert text.
use crate::storage::{CardDetail, Comment, UserAccount};
use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use portal_common::UserId;

/// Generic credential failure text
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials. Please try again.";

/// Fixed lockout text
pub const LOCKED_OUT_MESSAGE: &str = "Too many failed attempts. Try again in 1 minute.";

/// Navigation state and one-shot notice shared by every page
#[derive(Debug, Clone, Default)]
pub struct Chrome {
    pub current_user: Option<UserId>,
    pub flash: Option<String>,
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub chrome: Chrome,
}

#[derive(Template)]
#[template(path = "quotes.html")]
pub struct QuotesPage {
    pub chrome: Chrome,
}

#[derive(Template)]
#[template(path = "sitemap.html")]
pub struct SitemapPage {
    pub chrome: Chrome,
}

#[derive(Template)]
#[template(path = "forum.html")]
pub struct ForumPage {
    pub chrome: Chrome,
}

#[derive(Template)]
#[template(path = "downloads.html")]
pub struct DownloadsPage {
    pub chrome: Chrome,
}

#[derive(Template)]
#[template(path = "search.html")]
pub struct SearchPage {
    pub chrome: Chrome,
    pub query: String,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
    pub chrome: Chrome,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "profile.html")]
pub struct ProfilePage {
    pub chrome: Chrome,
    pub user: UserAccount,
    pub cards: Vec<CardDetail>,
}

#[derive(Template)]
#[template(path = "comments.html")]
pub struct CommentsPage {
    pub chrome: Chrome,
    pub comments: Vec<Comment>,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage {
    pub status: u16,
    pub code: &'static str,
    pub message: String,
}

/// Render `page` with `200 OK`
pub fn render<T: Template>(page: &T) -> Response {
    render_with_status(StatusCode::OK, page)
}

/// Render `page` with the given status
pub fn render_with_status<T: Template>(status: StatusCode, page: &T) -> Response {
    match page.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Template render error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
        },
    }
}
