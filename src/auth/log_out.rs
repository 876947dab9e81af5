//! Log-out route handler that forgets the session and redirects to the log-in page.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::PrivateCookieJar;

use crate::{
    auth::{AuthState, cookie::get_session_from_cookies, invalidate_session_cookie},
    endpoints,
};

/// Drop the session's controller, invalidate the session cookie and redirect
/// the client to the log-in page.
pub async fn get_log_out(State(state): State<AuthState>, jar: PrivateCookieJar) -> Response {
    if let Ok(session) = get_session_from_cookies(&jar) {
        state.sessions.remove(&session.access_token);
        tracing::info!("{} logged out", session.username);
    }

    (invalidate_session_cookie(jar), Redirect::to(endpoints::LOG_IN_VIEW)).into_response()
}
