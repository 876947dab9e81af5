//! The log-in page and the handler that exchanges credentials for a backend token.

use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    api::ApiError,
    auth::{
        AuthState, DEFAULT_COOKIE_DURATION, Session, normalize_redirect_url, set_session_cookie,
    },
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base, loading_spinner,
        log_in_card,
    },
};

/// Shown when the backend rejects the credentials without saying why.
pub const INVALID_CREDENTIALS_ERROR_MSG: &str = "Invalid credentials";

fn log_in_form(username: &str, error_message: Option<&str>, redirect_url: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::LOG_IN_API)
            hx-indicator="#indicator"
            hx-disabled-elt="#username, #password, #submit-button"
            class="space-y-4 md:space-y-6"
        {
            @if let Some(redirect_url) = redirect_url {
                input type="hidden" name="redirect_url" value=(redirect_url);
            }

            div
            {
                label for="username" class=(FORM_LABEL_STYLE) { "Username" }
                input
                    type="text"
                    name="username"
                    id="username"
                    value=(username)
                    autocomplete="username"
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="password" class=(FORM_LABEL_STYLE) { "Password" }
                input
                    type="password"
                    name="password"
                    id="password"
                    autocomplete="current-password"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            @if let Some(error_message) = error_message {
                p class="text-red-500 text-base" role="alert" { (error_message) }
            }

            button type="submit" id="submit-button" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Log in"
            }
        }
    }
}

fn parse_redirect_url(raw_url: Option<&str>, source: &str) -> Option<String> {
    let redirect_url = raw_url.and_then(normalize_redirect_url);

    if let (None, Some(raw_url)) = (&redirect_url, raw_url) {
        tracing::warn!("Invalid redirect URL from {source}: {raw_url}");
    }

    redirect_url
}

#[derive(Deserialize)]
pub struct RedirectQuery {
    pub redirect_url: Option<String>,
}

/// Display the log-in page.
pub async fn get_log_in_page(Query(query): Query<RedirectQuery>) -> Response {
    let redirect_url = parse_redirect_url(query.redirect_url.as_deref(), "log-in query");
    let form = log_in_form("", None, redirect_url.as_deref());
    let content = log_in_card("Log in to your account", &form);

    base("Log In", &[], &content).into_response()
}

/// The fields of the log-in form.
#[derive(Clone, Deserialize)]
pub struct LogInData {
    pub username: String,
    pub password: String,
    /// Where to go after logging in. Only accepted from the log-in form.
    pub redirect_url: Option<String>,
}

/// The message to show under the form for a failed log-in.
fn log_in_error_message(error: &ApiError) -> String {
    match error {
        // A 401 without a body reports the bare reason phrase.
        ApiError::Unauthorized(message) if message.is_empty() || message == "Unauthorized" => {
            INVALID_CREDENTIALS_ERROR_MSG.to_owned()
        }
        ApiError::Unauthorized(message) | ApiError::Status { message, .. } => message.clone(),
        error => format!("Login failed: {error}"),
    }
}

/// Handler for log-in requests via the POST method.
///
/// On success the session is stored in the cookie jar and the client is
/// redirected to the transactions page. Otherwise the form is returned with an
/// error message explaining the problem.
pub async fn post_log_in(
    State(state): State<AuthState>,
    jar: PrivateCookieJar,
    Form(user_data): Form<LogInData>,
) -> Response {
    let redirect_url = parse_redirect_url(user_data.redirect_url.as_deref(), "log-in form");
    let redirect_url = redirect_url.as_deref();

    let log_in_response = match state
        .sessions
        .api()
        .log_in(&user_data.username, &user_data.password)
        .await
    {
        Ok(response) => response,
        Err(error) => {
            if error.is_unauthorized() {
                tracing::info!("Log in rejected for {}", user_data.username);
            } else {
                tracing::error!("Log in failed: {error}");
            }

            let message = log_in_error_message(&error);
            return log_in_form(&user_data.username, Some(&message), redirect_url).into_response();
        }
    };

    let username = if log_in_response.username.is_empty() {
        user_data.username
    } else {
        log_in_response.username
    };
    let session = Session {
        access_token: log_in_response.access_token,
        username,
        expires_at: OffsetDateTime::now_utc() + DEFAULT_COOKIE_DURATION,
    };

    match set_session_cookie(jar, &session) {
        Ok(jar) => {
            tracing::info!("{} logged in", session.username);
            let redirect_url = redirect_url.unwrap_or(endpoints::TRANSACTIONS_VIEW);
            (HxRedirect(redirect_url.to_owned()), jar).into_response()
        }
        Err(error) => {
            tracing::error!("Error setting session cookie: {error}");
            (
                HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
                StatusCode::OK,
            )
                .into_response()
        }
    }
}
