//! Implements a struct that holds the state of the web server.

use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};

use crate::{
    Error,
    api::HttpCashbookApi,
    pagination::PaginationConfig,
    session::{SESSION_LIFETIME, SessionStore},
    timezone::get_local_offset,
};

/// The state of the web server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,

    /// The local timezone as a canonical timezone name, e.g. "Asia/Kolkata".
    pub local_timezone: String,

    /// The config that controls how many transactions are shown.
    pub pagination_config: PaginationConfig,

    /// One transaction view controller per logged-in user.
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    /// Create the state for a server that talks to the backend through `api`.
    ///
    /// `api` should not carry a session token. `local_timezone` should be a
    /// valid, canonical timezone name, e.g. "Asia/Kolkata".
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezoneError] if `local_timezone` is not a known timezone.
    pub fn new(
        api: HttpCashbookApi,
        cookie_secret: &str,
        local_timezone: &str,
        pagination_config: PaginationConfig,
    ) -> Result<Self, Error> {
        if get_local_offset(local_timezone).is_none() {
            return Err(Error::InvalidTimezoneError(local_timezone.to_owned()));
        }

        Ok(Self {
            cookie_key: create_cookie_key(cookie_secret),
            local_timezone: local_timezone.to_owned(),
            pagination_config,
            sessions: Arc::new(SessionStore::new(
                api,
                pagination_config,
                SESSION_LIFETIME,
            )),
        })
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Create a signing key for cookies from a `secret`s string.
pub fn create_cookie_key(secret: &str) -> Key {
    let hash = Sha512::digest(secret);

    Key::from(&hash)
}

#[cfg(test)]
mod app_state_tests {
    use crate::{Error, api::HttpCashbookApi, pagination::PaginationConfig};

    use super::AppState;

    fn api() -> HttpCashbookApi {
        HttpCashbookApi::new(reqwest::Client::new(), HttpCashbookApi::DEFAULT_BASE_URL)
    }

    #[test]
    fn new_state_has_no_sessions() {
        let state =
            AppState::new(api(), "secret", "Asia/Kolkata", PaginationConfig::default()).unwrap();

        assert!(state.sessions.is_empty());
    }

    #[test]
    fn rejects_unknown_timezone() {
        let result = AppState::new(api(), "secret", "Mars/Olympus", PaginationConfig::default());

        assert_eq!(
            result.err(),
            Some(Error::InvalidTimezoneError("Mars/Olympus".to_owned()))
        );
    }
}
