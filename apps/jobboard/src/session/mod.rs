//! Session store: the single owner of the bearer token and current user.
//!
//! State is published as whole `Session` snapshots through a watch channel.
//! Readers either take a snapshot or subscribe; only the store writes.

pub mod claims;
pub mod storage;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::guards::Route;
use crate::models::{Token, User};

pub use storage::{FileTokenStore, MemoryTokenStore, TokenStore};

/// Anything that can resolve a token into the user it belongs to.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn fetch_profile(&self, token: &str) -> Result<User, AppError>;
}

/// One consistent view of the session. A token is only ever published
/// together with the profile it was validated against.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<User>,
    pub loading: bool,
}

impl Session {
    fn loading() -> Self {
        Session {
            token: None,
            user: None,
            loading: true,
        }
    }

    fn logged_out() -> Self {
        Session {
            token: None,
            user: None,
            loading: false,
        }
    }

    fn authenticated(token: String, user: User) -> Self {
        Session {
            token: Some(token),
            user: Some(user),
            loading: false,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().map(|u| u.is_admin).unwrap_or(false)
    }

    pub fn is_profile_complete(&self) -> bool {
        self.user
            .as_ref()
            .map(User::is_profile_complete)
            .unwrap_or(false)
    }
}

/// Logs every published session change until the store is dropped.
pub fn log_transitions(mut rx: watch::Receiver<Session>) {
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let session = rx.borrow_and_update().clone();
            debug!(
                "Session changed: loading={} authenticated={} admin={}",
                session.loading,
                session.is_authenticated(),
                session.is_admin()
            );
        }
    });
}

pub struct SessionStore {
    profiles: Arc<dyn ProfileSource>,
    storage: Arc<dyn TokenStore>,
    state: watch::Sender<Session>,
}

impl SessionStore {
    /// Starts in the loading state; call `initialize` before reading.
    pub fn new(profiles: Arc<dyn ProfileSource>, storage: Arc<dyn TokenStore>) -> Self {
        let (state, _) = watch::channel(Session::loading());
        Self {
            profiles,
            storage,
            state,
        }
    }

    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn is_admin(&self) -> bool {
        self.state.borrow().is_admin()
    }

    pub fn is_profile_complete(&self) -> bool {
        self.state.borrow().is_profile_complete()
    }

    fn replace(&self, session: Session) {
        self.state.send_replace(session);
    }

    /// Rehydrates from storage. Any failure ends logged out with storage
    /// cleared; nothing is retried.
    pub async fn initialize(&self) -> Session {
        self.replace(Session::loading());

        let stored = match self.storage.load().await {
            Ok(stored) => stored,
            Err(e) => {
                warn!("Failed to read stored token: {}", e);
                None
            }
        };

        let Some(token) = stored else {
            self.replace(Session::logged_out());
            return self.snapshot();
        };

        if !claims::is_unexpired(&token, Utc::now()) {
            info!("Stored token expired (client-side check)");
            self.discard().await;
            return self.snapshot();
        }

        match self.profiles.fetch_profile(&token).await {
            Ok(user) => {
                info!("Session restored for {}", user.display_name());
                self.replace(Session::authenticated(token, user));
            }
            Err(e) => {
                warn!("Failed to initialize session from stored token: {}", e);
                self.discard().await;
            }
        }

        self.snapshot()
    }

    /// Persists a freshly issued token and loads its profile. On failure the
    /// session is rolled back to logged out and the error returned.
    pub async fn login(&self, token: Token) -> Result<User, AppError> {
        self.replace(Session::loading());

        if let Err(e) = self.storage.save(&token.access_token).await {
            self.replace(Session::logged_out());
            return Err(e);
        }

        match self.profiles.fetch_profile(&token.access_token).await {
            Ok(user) => {
                info!("Logged in as {}", user.display_name());
                self.replace(Session::authenticated(token.access_token, user.clone()));
                Ok(user)
            }
            Err(e) => {
                warn!("Failed to fetch user details after login: {}", e);
                self.discard().await;
                Err(e)
            }
        }
    }

    /// Clears the session. Returns where to navigate next: the login page,
    /// unless `current` is already part of the auth flow.
    pub async fn logout(&self, current: &Route) -> Option<Route> {
        self.discard().await;
        info!("Logged out");
        if current.is_auth_flow() {
            None
        } else {
            Some(Route::login())
        }
    }

    /// Swaps in an updated profile, keeping the token.
    pub fn update_current_user(&self, user: User) {
        let token = self.token();
        match token {
            Some(token) => self.replace(Session::authenticated(token, user)),
            None => warn!("Ignoring profile update without an active session"),
        }
    }

    async fn discard(&self) {
        if let Err(e) = self.storage.clear().await {
            warn!("Failed to clear stored token: {}", e);
        }
        self.replace(Session::logged_out());
    }
}
