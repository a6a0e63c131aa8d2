//! Login and logout.
use super::{chrome, found};
use crate::{
    auth::{LoginOutcome, SessionState},
    error::AppError,
    middleware::{session::session_cookie, SessionHandle},
    validation::validate_login,
    views::{
        render, render_with_status, Chrome, LoginPage, INVALID_CREDENTIALS_MESSAGE,
        LOCKED_OUT_MESSAGE,
    },
    AppState,
};
use axum::{
    extract::State,
    http::{header::SET_COOKIE, StatusCode},
    response::Response,
    Extension, Form,
};
use portal_common::LoginForm;
use std::time::SystemTime;
use tracing::warn;

pub const LOGIN_SUCCESS_MESSAGE: &str = "Login successful!";
pub const LOGOUT_MESSAGE: &str = "You were successfully logged out";

/// Login form, or the lockout notice while a lockout is active
pub async fn login_page(
    State(state): State<AppState>,
    Extension(handle): Extension<SessionHandle>,
) -> Response {
    let error = handle
        .state
        .is_locked(SystemTime::now())
        .then(|| LOCKED_OUT_MESSAGE.to_string());
    render(&LoginPage {
        chrome: chrome(&state, &handle).await,
        error,
    })
}

/// Run the login flow for the submitted credentials
pub async fn login(
    State(state): State<AppState>,
    Extension(handle): Extension<SessionHandle>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let credentials = validate_login(form)?;

    let mut session = handle.state.clone();
    let outcome = state
        .auth
        .attempt_login(&mut session, &credentials.username, &credentials.password)
        .await?;

    match outcome {
        LoginOutcome::Success(user_id) => {
            session.flash = Some(LOGIN_SUCCESS_MESSAGE.to_string());

            // Rotate the token so a pre-login token never carries an identity.
            let token = state.sessions.new_token();
            state.sessions.remove(&handle.token).await;
            state.sessions.save(&token, session).await;

            let mut response = found(&format!("/profile/{user_id}"));
            let settings = &state.settings.session;
            match session_cookie(&token, settings.absolute_ttl_secs, settings.cookie_secure) {
                Some(cookie) => {
                    response.headers_mut().insert(SET_COOKIE, cookie);
                },
                None => warn!("failed to build session cookie"),
            }
            Ok(response)
        },
        LoginOutcome::Invalid => {
            let flash = session.take_flash();
            state.sessions.save(&handle.token, session.clone()).await;

            // The failure that starts a lockout already reports it.
            let (status, message) = if session.is_locked(SystemTime::now()) {
                (StatusCode::TOO_MANY_REQUESTS, LOCKED_OUT_MESSAGE)
            } else {
                (StatusCode::UNAUTHORIZED, INVALID_CREDENTIALS_MESSAGE)
            };
            Ok(login_form(status, &session, flash, message))
        },
        LoginOutcome::Locked { .. } => {
            let flash = session.take_flash();
            if flash.is_some() {
                state.sessions.save(&handle.token, session.clone()).await;
            }
            Ok(login_form(
                StatusCode::TOO_MANY_REQUESTS,
                &session,
                flash,
                LOCKED_OUT_MESSAGE,
            ))
        },
    }
}

fn login_form(
    status: StatusCode,
    session: &SessionState,
    flash: Option<String>,
    message: &str,
) -> Response {
    render_with_status(
        status,
        &LoginPage {
            chrome: Chrome {
                current_user: session.authenticated_user,
                flash,
            },
            error: Some(message.to_string()),
        },
    )
}

/// Sign out and go back to the home page
pub async fn logout(
    State(state): State<AppState>,
    Extension(handle): Extension<SessionHandle>,
) -> Response {
    let mut session = handle.state;
    session.logout();
    session.flash = Some(LOGOUT_MESSAGE.to_string());
    state.sessions.save(&handle.token, session).await;
    found("/")
}
