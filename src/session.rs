//! Auth Session
//!
//! Explicit login lifecycle: `Loading` until the stored token is resolved,
//! then `Authenticated` or `Unauthenticated`. The session owns its client so
//! tests can drive it with a mock transport and in-memory tokens.

use crate::api::{ApiClient, TokenStore, Transport};
use crate::error::ApiResult;
use crate::models::User;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Loading,
    Authenticated(User),
    Unauthenticated,
}

impl SessionState {
    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }
}

pub struct AuthSession<T, S> {
    client: ApiClient<T, S>,
    state: SessionState,
}

impl<T: Transport, S: TokenStore> AuthSession<T, S> {
    pub fn new(client: ApiClient<T, S>) -> Self {
        Self {
            client,
            state: SessionState::Loading,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn client(&self) -> &ApiClient<T, S> {
        &self.client
    }

    /// Resolve the current user from the stored token. An invalid token is
    /// discarded silently; the session just becomes unauthenticated.
    pub async fn resolve(&mut self) -> &SessionState {
        if self.client.tokens().access_token().is_none() {
            self.state = SessionState::Unauthenticated;
            return &self.state;
        }
        let _ = self.fetch_user().await;
        &self.state
    }

    /// Log in, then load the user with the freshly stored token. Fails if
    /// either step fails; the session is then unauthenticated and the
    /// stored tokens are gone.
    pub async fn login(&mut self, email: &str, password: &str) -> ApiResult<()> {
        if let Err(e) = self.client.login(email, password).await {
            self.state = SessionState::Unauthenticated;
            return Err(e);
        }
        self.fetch_user().await
    }

    async fn fetch_user(&mut self) -> ApiResult<()> {
        match self.client.current_user().await {
            Ok(user) => {
                tracing::info!("session resolved for {}", user.email);
                self.state = SessionState::Authenticated(user);
                Ok(())
            }
            Err(e) => {
                tracing::info!("stored token rejected ({}), signing out", e);
                self.client.logout();
                self.state = SessionState::Unauthenticated;
                Err(e)
            }
        }
    }

    /// Create the account and sign straight in.
    pub async fn register(&mut self, email: &str, password: &str) -> ApiResult<()> {
        self.client.register(email, password).await?;
        self.login(email, password).await
    }

    /// Clears tokens without a server round-trip.
    pub fn logout(&mut self) {
        self.client.logout();
        self.state = SessionState::Unauthenticated;
    }
}
