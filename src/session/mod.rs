//! Auth session store.
//!
//! Single source of truth for who is signed in. Route guards read it; the REST client writes to it
//! on login and on a rejected token.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

use crate::errors::AppError;
use crate::models::{Session, UserPayload};
use crate::storage::{Storage, TOKEN_KEY, USER_KEY};

/// Lifecycle of the client session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Persisted credentials have not been checked yet
    Loading,
    Anonymous,
    Authenticated(Session),
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::Authenticated(session) => Some(session),
            _ => None,
        }
    }
}

/// Decides whether a persisted token still identifies a user.
///
/// `stored` is the payload saved alongside the token, if it could be read.
pub trait TokenValidator {
    fn validate(
        &self,
        token: &str,
        stored: Option<UserPayload>,
    ) -> impl Future<Output = Result<Option<UserPayload>, AppError>> + Send;
}

/// Trusts the locally stored payload without contacting the server.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalValidator;

impl TokenValidator for LocalValidator {
    fn validate(
        &self,
        _token: &str,
        stored: Option<UserPayload>,
    ) -> impl Future<Output = Result<Option<UserPayload>, AppError>> + Send {
        std::future::ready(Ok(stored))
    }
}

/// Owner of the session for the lifetime of the portal.
pub struct AuthStore {
    storage: Arc<dyn Storage>,
    state: watch::Sender<SessionState>,
}

impl AuthStore {
    /// Create a store in the `Loading` state. Call [`AuthStore::restore`] to settle it.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        let (state, _) = watch::channel(SessionState::Loading);
        Self { storage, state }
    }

    /// Restore the session from the persisted token and payload.
    pub async fn restore(&self) -> SessionState {
        self.restore_with(&LocalValidator).await
    }

    /// Restore the session, letting `validator` confirm the persisted token.
    ///
    /// A login that lands while validation is pending wins over the restored result.
    pub async fn restore_with<V: TokenValidator>(&self, validator: &V) -> SessionState {
        let token = match self.storage.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!("Could not read persisted token: {}", e);
                None
            }
        };

        // (restored session, whether the persisted credentials are stale)
        let (restored, stale) = match token {
            None => (None, true),
            Some(token) => {
                let stored = self.stored_user();
                match validator.validate(&token, stored.clone()).await {
                    Ok(Some(user)) => (Some(Session::new(token, user)), false),
                    Ok(None) => {
                        tracing::info!("Persisted token was not accepted, clearing session");
                        (None, true)
                    }
                    Err(e) if e.is_unauthorized() => {
                        tracing::info!("Persisted token rejected: {}", e);
                        (None, true)
                    }
                    Err(e) => {
                        tracing::warn!("Token validation failed, using stored session: {}", e);
                        let session = stored.map(|user| Session::new(token, user));
                        let stale = session.is_none();
                        (session, stale)
                    }
                }
            }
        };

        let next = match restored {
            Some(session) => SessionState::Authenticated(session),
            None => SessionState::Anonymous,
        };

        let applied = self.state.send_if_modified(|state| {
            if state.is_loading() {
                *state = next;
                true
            } else {
                false
            }
        });

        if applied && stale {
            self.clear_persisted();
        }

        let settled = self.state();
        tracing::debug!("Session restored: {:?}", settled.session().map(|s| s.role));
        settled
    }

    /// Start a session for `user`, persisting the token and payload.
    pub fn login(&self, token: &str, user: UserPayload) {
        if let Err(e) = self.storage.set(TOKEN_KEY, token) {
            tracing::warn!("Could not persist token: {}", e);
        }
        match serde_json::to_string(&user) {
            Ok(raw) => {
                if let Err(e) = self.storage.set(USER_KEY, &raw) {
                    tracing::warn!("Could not persist user: {}", e);
                }
            }
            Err(e) => tracing::warn!("Could not encode user: {}", e),
        }

        tracing::info!("Signed in as {} ({})", user.email, user.role);
        self.state
            .send_replace(SessionState::Authenticated(Session::new(token, user)));
    }

    /// End the session and forget the persisted credentials.
    pub fn logout(&self) {
        self.clear_persisted();
        let previous = self.state.send_replace(SessionState::Anonymous);
        if let SessionState::Authenticated(session) = previous {
            tracing::info!("Signed out {}", session.email);
        }
    }

    pub fn current_user(&self) -> Option<Session> {
        self.state.borrow().session().cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    /// Bearer token of the current session, if any.
    pub fn token(&self) -> Option<String> {
        self.state.borrow().session().map(|s| s.token.clone())
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Watch session changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    fn stored_user(&self) -> Option<UserPayload> {
        let raw = match self.storage.get(USER_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!("Could not read persisted user: {}", e);
                return None;
            }
        };
        serde_json::from_str(&raw)
            .map_err(|e| tracing::warn!("Ignoring unreadable persisted user: {}", e))
            .ok()
    }

    fn clear_persisted(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove(key) {
                tracing::warn!("Could not clear {}: {}", key, e);
            }
        }
    }
}
