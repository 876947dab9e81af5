//! Authentication middleware that reads the session cookie, attaches the
//! session's controller to the request and handles forced re-login.

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;

use crate::{
    AppState,
    auth::{
        build_log_in_redirect_url,
        cookie::{get_session_from_cookies, invalidate_session_cookie},
    },
    session::SessionStore,
};

/// The state needed for the auth middleware
#[derive(Clone)]
pub struct AuthState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The controllers of the logged-in users.
    pub sessions: Arc<SessionStore>,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            sessions: Arc::clone(&state.sessions),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AuthState> for Key {
    fn from_ref(state: &AuthState) -> Self {
        state.cookie_key.clone()
    }
}

/// Response extension set when the backend rejected the session token.
///
/// The middleware swaps any response carrying it for a redirect to the log-in
/// page, after dropping the session.
#[derive(Debug, Clone, Copy)]
pub struct SessionExpired;

/// Checks for a valid session cookie, then runs the request with the
/// [Session](crate::auth::Session) and its
/// [SessionController](crate::session::SessionController) in the request
/// extensions. Requests without a valid session get the response from
/// `get_redirect`.
#[inline]
async fn auth_guard_internal(
    state: AuthState,
    request: Request,
    next: Next,
    get_redirect: impl Fn(&str) -> Response,
) -> Response {
    let log_in_redirect_url = build_log_in_redirect_url(&request);

    let (mut parts, body) = request.into_parts();
    let jar = match PrivateCookieJar::from_request_parts(&mut parts, &state).await {
        Ok(jar) => jar,
        Err(error) => {
            tracing::error!("Error getting cookie jar: {error:?}. Redirecting to log in page.");
            return get_redirect(&log_in_redirect_url);
        }
    };
    let session = match get_session_from_cookies(&jar) {
        Ok(session) => session,
        Err(error) => {
            tracing::debug!("No usable session ({error}), redirecting to log in page.");
            return get_redirect(&log_in_redirect_url);
        }
    };

    let controller = state.sessions.controller_for(&session.access_token);
    parts.extensions.insert(session.clone());
    parts.extensions.insert(controller);

    let response = next.run(Request::from_parts(parts, body)).await;

    if response.extensions().get::<SessionExpired>().is_none() {
        return response;
    }

    tracing::info!(
        "Backend rejected the session for {}, logging out.",
        session.username
    );
    state.sessions.remove(&session.access_token);

    (
        invalidate_session_cookie(jar),
        get_redirect(&log_in_redirect_url),
    )
        .into_response()
}

/// Middleware for page routes, redirecting to the log-in page when the user
/// is not logged in.
///
/// **Note**: Route handlers can use `Extension(controller): Extension<Arc<SessionController>>`
/// and `Extension(session): Extension<Session>`.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    auth_guard_internal(state, request, next, |redirect_url| {
        Redirect::to(redirect_url).into_response()
    })
    .await
}

/// Middleware for htmx routes, sending an HTMX redirect to the log-in page
/// when the user is not logged in.
pub async fn auth_guard_hx(
    State(state): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    auth_guard_internal(state, request, next, |redirect_url| {
        (HxRedirect(redirect_url.to_owned()), StatusCode::OK).into_response()
    })
    .await
}
