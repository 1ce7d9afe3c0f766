//! Session token ownership.

use picsync_error::{HostError, HostErrorKind, PicsyncResult};
use picsync_host::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, instrument};

/// Key holding the bearer token; an empty value means logged out.
pub const AUTH_TOKEN_KEY: &str = "auth_token";

/// Snapshot of the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthState {
    /// A non-empty token is held
    pub is_authenticated: bool,
    /// The bearer token, when authenticated
    pub token: Option<String>,
    /// The stored token has been read
    pub is_initialized: bool,
}

/// Owns the bearer token and tells subscribers when it changes.
///
/// Created once by the application root and shared by `Arc`.
pub struct AuthManager {
    store: Arc<dyn KeyValueStore>,
    state: watch::Sender<AuthState>,
}

impl std::fmt::Debug for AuthManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("AuthManager")
            .field("is_authenticated", &state.is_authenticated)
            .field("is_initialized", &state.is_initialized)
            .finish_non_exhaustive()
    }
}

impl AuthManager {
    /// Manager over `store` that has not read the stored token yet.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let (state, _) = watch::channel(AuthState::default());
        Self { store, state }
    }

    /// Manager with the stored token already loaded.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let manager = Self::new(store);
        manager.initialize();
        manager
    }

    /// Read the stored token and publish the resulting state.
    #[instrument(skip(self))]
    pub fn initialize(&self) {
        let token = self
            .store
            .get(AUTH_TOKEN_KEY)
            .filter(|token| !token.is_empty());
        debug!(has_token = token.is_some(), "Auth state initialized");
        self.state.send_replace(AuthState {
            is_authenticated: token.is_some(),
            token,
            is_initialized: true,
        });
    }

    /// Current state.
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Current bearer token, if any.
    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    /// Whether a token is held.
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated
    }

    /// Store `token` and notify subscribers.
    ///
    /// An empty token is treated as a logout.
    #[instrument(skip(self, token))]
    pub async fn set_authenticated(&self, token: &str) -> PicsyncResult<()> {
        if token.is_empty() {
            return self.invalidate().await;
        }
        self.persist_token(token).await?;
        info!("Session authenticated");
        self.state.send_replace(AuthState {
            is_authenticated: true,
            token: Some(token.to_string()),
            is_initialized: true,
        });
        Ok(())
    }

    /// Forget the token and notify subscribers.
    #[instrument(skip(self))]
    pub async fn invalidate(&self) -> PicsyncResult<()> {
        self.persist_token("").await?;
        info!("Session invalidated");
        self.state.send_replace(AuthState {
            is_authenticated: false,
            token: None,
            is_initialized: true,
        });
        Ok(())
    }

    /// Write the token on the blocking pool; file-backed stores touch disk.
    async fn persist_token(&self, token: &str) -> PicsyncResult<()> {
        let store = Arc::clone(&self.store);
        let token = token.to_string();
        tokio::task::spawn_blocking(move || store.set(AUTH_TOKEN_KEY, &token))
            .await
            .map_err(|e| HostError::new(HostErrorKind::Storage(e.to_string())))?
    }

    /// Receiver that sees every state change.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }
}
