// ============================
// crates/backend-lib/src/router.rs
// ============================
//! Route table.
use crate::{
    handlers::{comments, download, login, pages, profile},
    middleware::session_layer,
    AppState,
};
use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

/// Build the site router with session resolution and request tracing
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/quotes", get(pages::quotes))
        .route("/sitemap", get(pages::sitemap))
        .route("/forum", get(pages::forum))
        .route("/downloads", get(pages::downloads))
        .route("/search", get(pages::search))
        .route("/redirect", get(pages::redirect))
        .route("/login", get(login::login_page).post(login::login))
        .route("/logout", get(login::logout))
        .route("/profile", get(profile::own_profile))
        .route("/profile/{user_id}", get(profile::profile))
        .route(
            "/comments",
            get(comments::list_comments).post(comments::post_comment),
        )
        .route("/download", get(download::download))
        .layer(middleware::from_fn_with_state(state.clone(), session_layer))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
