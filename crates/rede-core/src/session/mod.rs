//! Session lifecycle: the authenticated identity and its bearer token.
//!
//! The [`SessionManager`] owns the persisted token and the in-memory
//! session state. It registers the process-wide unauthorized handler at
//! construction, so a 401 on any request anywhere performs the same
//! state clearing as an explicit sign-out.

pub mod token;
pub mod unauthorized;

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};

pub use token::{StoredToken, TokenStore};
pub use unauthorized::UnauthorizedRegistry;

use crate::api::types::User;
use crate::api::{ApiClient, auth};

/// Session state machine.
///
/// `Uninitialized → Hydrating → { Authenticated, Anonymous }`;
/// `Authenticated → Anonymous` on sign-out or 401;
/// `Anonymous → Authenticated` on successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Uninitialized,
    Hydrating,
    Authenticated(User),
    Anonymous,
}

impl SessionState {
    /// True while startup hydration has not settled yet.
    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Uninitialized | SessionState::Hydrating)
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// Owns the token lifecycle and the current identity.
pub struct SessionManager {
    api: Arc<ApiClient>,
    tokens: TokenStore,
    registry: Arc<UnauthorizedRegistry>,
    registration: unauthorized::RegistrationId,
    state: Arc<Mutex<SessionState>>,
    // Token reads/writes are a single-writer resource: every operation
    // that touches the persisted token serializes through this gate.
    gate: tokio::sync::Mutex<()>,
}

impl SessionManager {
    /// Creates the manager and installs the global 401 handler.
    ///
    /// The handler captures the live state and token store directly, so
    /// the registered closure can never go stale; re-registration is only
    /// needed when a new manager replaces this one.
    pub fn new(
        api: Arc<ApiClient>,
        tokens: TokenStore,
        registry: Arc<UnauthorizedRegistry>,
    ) -> Self {
        let state = Arc::new(Mutex::new(SessionState::Uninitialized));

        let handler_tokens = tokens.clone();
        let handler_state = Arc::clone(&state);
        let registration = registry.set_handler(move || {
            tracing::info!("unauthorized response: clearing session");
            if let Err(err) = handler_tokens.clear() {
                tracing::warn!("failed to clear token on 401: {err:#}");
            }
            *handler_state.lock().unwrap_or_else(std::sync::PoisonError::into_inner) =
                SessionState::Anonymous;
        });

        Self {
            api,
            tokens,
            registry,
            registration,
            state,
            gate: tokio::sync::Mutex::new(()),
        }
    }

    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    /// Snapshot of the current session state.
    pub fn state(&self) -> SessionState {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state().user().cloned()
    }

    fn set_state(&self, next: SessionState) {
        *self
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = next;
    }

    /// Startup hydration: reconstructs the session from the persisted token.
    ///
    /// Runs at most once per manager; later calls are no-ops. A missing
    /// token settles to `Anonymous` without touching the network. A
    /// present token is confirmed against `/usuario/me`; any failure
    /// clears the persisted token and settles to `Anonymous`.
    pub async fn hydrate(&self) {
        let _gate = self.gate.lock().await;
        {
            let mut state = self
                .state
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            if !matches!(*state, SessionState::Uninitialized) {
                tracing::debug!("hydrate called twice; ignoring");
                return;
            }
            *state = SessionState::Hydrating;
        }

        let has_token = matches!(self.tokens.load(), Ok(Some(_)));
        if !has_token {
            self.set_state(SessionState::Anonymous);
            return;
        }

        match auth::me(&self.api).await {
            Ok(user) => {
                tracing::debug!(user_id = user.id, "session hydrated");
                self.set_state(SessionState::Authenticated(user));
            }
            Err(err) => {
                tracing::debug!("hydration rejected: {err}");
                if let Err(err) = self.tokens.clear() {
                    tracing::warn!("failed to clear rejected token: {err:#}");
                }
                self.set_state(SessionState::Anonymous);
            }
        }
    }

    /// Signs in: login, persist the token, confirm the identity.
    ///
    /// The user is only stored after `/usuario/me` succeeds; there is no
    /// optimistic identity. No retry on failure.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User> {
        let _gate = self.gate.lock().await;
        self.sign_in_locked(email, password).await
    }

    async fn sign_in_locked(&self, email: &str, password: &str) -> Result<User> {
        let login = auth::login(&self.api, email, password).await?;
        self.tokens
            .save(&StoredToken {
                access_token: login.access_token,
                token_type: login.token_type,
            })
            .context("persisting session token")?;

        let user = auth::me(&self.api).await?;
        self.set_state(SessionState::Authenticated(user.clone()));
        Ok(user)
    }

    /// Creates the account, then performs the sign-in flow.
    ///
    /// The server contract: signup does not itself yield a session.
    pub async fn sign_up(&self, name: &str, email: &str, password: &str) -> Result<User> {
        let _gate = self.gate.lock().await;
        auth::signup(&self.api, name, email, password).await?;
        self.sign_in_locked(email, password).await
    }

    /// Clears the persisted token and the in-memory user unconditionally.
    ///
    /// Never fails; the storage clear is best-effort.
    pub async fn sign_out(&self) {
        let _gate = self.gate.lock().await;
        if let Err(err) = self.tokens.clear() {
            tracing::warn!("failed to clear token on sign-out: {err:#}");
        }
        self.set_state(SessionState::Anonymous);
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        self.registry.clear_handler(self.registration);
    }
}
