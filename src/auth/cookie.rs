//! Stores the logged-in user's session in a private (encrypted) cookie.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::{Error, auth::Session};

pub(crate) const COOKIE_SESSION: &str = "session";
/// How long auth cookies are valid. Matches the backend token lifetime.
pub(crate) const DEFAULT_COOKIE_DURATION: Duration = Duration::hours(24);

/// Why the session could not be read from the cookie jar.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CookieError {
    /// There is no session cookie, or it could not be decrypted.
    #[error("no session cookie")]
    Missing,
    /// The cookie decrypted but did not hold a session.
    #[error("invalid session cookie: {0}")]
    Invalid(String),
    /// The session is past its expiry.
    #[error("the session has expired")]
    Expired,
}

/// Add the session cookie to the cookie jar, indicating that a user is logged in.
///
/// The cookie expires together with `session`.
///
/// # Errors
///
/// Returns [Error::CookieError] if the session cannot be serialized.
pub(crate) fn set_session_cookie(
    jar: PrivateCookieJar,
    session: &Session,
) -> Result<PrivateCookieJar, Error> {
    let session_json =
        serde_json::to_string(session).map_err(|error| Error::CookieError(error.to_string()))?;

    Ok(jar.add(
        Cookie::build((COOKIE_SESSION, session_json))
            .expires(session.expires_at)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    ))
}

/// Set the session cookie to an invalid value and set its max age to zero,
/// which should delete the cookie on the client side.
pub(crate) fn invalidate_session_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_SESSION, "deleted"))
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Read the session from the cookie jar, rejecting expired sessions.
pub(crate) fn get_session_from_cookies(jar: &PrivateCookieJar) -> Result<Session, CookieError> {
    let cookie = jar.get(COOKIE_SESSION).ok_or(CookieError::Missing)?;
    let session: Session = serde_json::from_str(cookie.value_trimmed())
        .map_err(|error| CookieError::Invalid(error.to_string()))?;

    if session.is_valid_at(OffsetDateTime::now_utc()) {
        Ok(session)
    } else {
        Err(CookieError::Expired)
    }
}
