//! Static pages, search echo and the redirect helper.
use super::{chrome, found};
use crate::{
    error::AppError,
    middleware::SessionHandle,
    validation::validate_redirect_target,
    views::{render, DownloadsPage, ForumPage, IndexPage, QuotesPage, SearchPage, SitemapPage},
    AppState,
};
use axum::{
    extract::{Query, State},
    response::Response,
    Extension,
};
use portal_common::{RedirectQuery, SearchQuery};

pub async fn index(
    State(state): State<AppState>,
    Extension(handle): Extension<SessionHandle>,
) -> Response {
    render(&IndexPage {
        chrome: chrome(&state, &handle).await,
    })
}

pub async fn quotes(
    State(state): State<AppState>,
    Extension(handle): Extension<SessionHandle>,
) -> Response {
    render(&QuotesPage {
        chrome: chrome(&state, &handle).await,
    })
}

pub async fn sitemap(
    State(state): State<AppState>,
    Extension(handle): Extension<SessionHandle>,
) -> Response {
    render(&SitemapPage {
        chrome: chrome(&state, &handle).await,
    })
}

pub async fn forum(
    State(state): State<AppState>,
    Extension(handle): Extension<SessionHandle>,
) -> Response {
    render(&ForumPage {
        chrome: chrome(&state, &handle).await,
    })
}

pub async fn downloads(
    State(state): State<AppState>,
    Extension(handle): Extension<SessionHandle>,
) -> Response {
    render(&DownloadsPage {
        chrome: chrome(&state, &handle).await,
    })
}

/// Echo the search query back as text
pub async fn search(
    State(state): State<AppState>,
    Extension(handle): Extension<SessionHandle>,
    Query(query): Query<SearchQuery>,
) -> Response {
    render(&SearchPage {
        chrome: chrome(&state, &handle).await,
        query: query.query.unwrap_or_default(),
    })
}

/// Redirect to an allow-listed internal page
pub async fn redirect(Query(query): Query<RedirectQuery>) -> Result<Response, AppError> {
    let destination = validate_redirect_target(query.destination.as_deref())?;
    Ok(found(destination))
}
