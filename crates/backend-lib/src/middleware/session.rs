//! Session cookie resolution.
//!
//! Every request gets a [`SessionHandle`] naming the server-side session it
//! belongs to. Tokens the store does not know are never adopted: the client
//! is handed a freshly minted token instead.
use crate::{
    auth::{token_generator::is_well_formed, SessionState},
    AppState,
};
use axum::{
    extract::{Request, State},
    http::{
        header::{COOKIE, SET_COOKIE},
        HeaderMap, HeaderValue,
    },
    middleware::Next,
    response::Response,
};
use tracing::warn;

/// Name of the session cookie
pub const SESSION_COOKIE_NAME: &str = "portal_session";

/// Session bound to the current request
#[derive(Debug, Clone)]
pub struct SessionHandle {
    /// Opaque token keying the session store
    pub token: String,
    /// State as loaded when the request arrived
    pub state: SessionState,
    /// The token was minted for this request
    pub fresh: bool,
}

/// Resolve the session cookie and attach a [`SessionHandle`] to the request
pub async fn session_layer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let presented = extract_session_token(request.headers());

    let known = match presented {
        Some(token) => state
            .sessions
            .load(&token)
            .await
            .map(|session| (token, session)),
        None => None,
    };

    let handle = match known {
        Some((token, session)) => SessionHandle {
            token,
            state: session,
            fresh: false,
        },
        None => SessionHandle {
            token: state.sessions.new_token(),
            state: SessionState::default(),
            fresh: true,
        },
    };
    let fresh_token = handle.fresh.then(|| handle.token.clone());
    request.extensions_mut().insert(handle);

    let mut response = next.run(request).await;

    // Handlers that rotate the session set their own cookie.
    if let Some(token) = fresh_token {
        if !response.headers().contains_key(SET_COOKIE) {
            let settings = &state.settings.session;
            match session_cookie(&token, settings.absolute_ttl_secs, settings.cookie_secure) {
                Some(cookie) => {
                    response.headers_mut().insert(SET_COOKIE, cookie);
                },
                None => warn!("failed to build session cookie"),
            }
        }
    }
    response
}

/// Build an `HttpOnly` cookie carrying the session token
pub fn session_cookie(token: &str, max_age_secs: u64, secure: bool) -> Option<HeaderValue> {
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).ok()
}

/// Session token from the `Cookie` header, if present and well formed
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == SESSION_COOKIE_NAME)
        .map(|(_, value)| value.trim().to_string())
        .filter(|token| is_well_formed(token))
}
