//! Keeps one transaction view controller per logged-in user.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use time::{Duration, OffsetDateTime};

use crate::{
    api::HttpCashbookApi, pagination::PaginationConfig,
    transaction::TransactionViewController,
};

/// The controller type held for each session.
pub type SessionController = TransactionViewController<HttpCashbookApi>;

/// How long a session's controller is kept. Matches the backend token lifetime.
pub const SESSION_LIFETIME: Duration = Duration::hours(24);

#[derive(Debug)]
struct SessionEntry {
    controller: Arc<SessionController>,
    created_at: OffsetDateTime,
}

/// Maps backend access tokens to the controller for that login.
#[derive(Debug)]
pub struct SessionStore {
    api: HttpCashbookApi,
    pagination: PaginationConfig,
    lifetime: Duration,
    sessions: Mutex<HashMap<String, SessionEntry>>,
}

impl SessionStore {
    /// Create an empty store.
    ///
    /// `api` is a client without a token. Each controller gets a copy that
    /// authenticates with its session's token.
    pub fn new(api: HttpCashbookApi, pagination: PaginationConfig, lifetime: Duration) -> Self {
        Self {
            api,
            pagination,
            lifetime,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// The client without a token, for logging in.
    pub fn api(&self) -> &HttpCashbookApi {
        &self.api
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, SessionEntry>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The controller for `access_token`, created on first use.
    ///
    /// Creating a controller also drops those that outlived the session lifetime.
    pub fn controller_for(&self, access_token: &str) -> Arc<SessionController> {
        let mut sessions = self.lock();

        if let Some(entry) = sessions.get(access_token) {
            return Arc::clone(&entry.controller);
        }

        let now = OffsetDateTime::now_utc();
        let lifetime = self.lifetime;
        let count_before = sessions.len();
        sessions.retain(|_, entry| now - entry.created_at < lifetime);
        let pruned = count_before - sessions.len();

        if pruned > 0 {
            tracing::debug!("Pruned {pruned} expired sessions");
        }

        let controller = Arc::new(TransactionViewController::new(
            self.api.with_token(access_token),
            self.pagination,
        ));
        sessions.insert(
            access_token.to_owned(),
            SessionEntry {
                controller: Arc::clone(&controller),
                created_at: now,
            },
        );
        tracing::debug!("Created controller for new session, {} active", sessions.len());

        controller
    }

    /// Forget the controller for `access_token`, e.g. on log-out.
    pub fn remove(&self, access_token: &str) {
        self.lock().remove(access_token);
    }

    /// The number of sessions held.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no sessions are held.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
