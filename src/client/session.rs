use async_trait::async_trait;
use tracing::{info, warn};

use crate::auth::dto::{AuthResponse, PublicUser};
use crate::client::token_store::TokenStore;
use crate::error::ApiError;

/// Backend calls the client depends on, kept behind a trait so the state
/// machine can be exercised without a server.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<AuthResponse, ApiError>;
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError>;
    async fn sign_out(&self, token: &str) -> Result<(), ApiError>;
    async fn current_user(&self, token: &str) -> Result<Option<PublicUser>, ApiError>;
}

/// Explicit auth state. Every transition is driven by a confirmed server
/// response; there are no timers guessing when state has settled.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    Unauthenticated,
    Authenticating,
    Authenticated { token: String, user: PublicUser },
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated { .. })
    }
}

/// Composes the persisted token cache with the auth API. The stored token
/// is loaded once at startup and only changes on confirmed sign-in/up and
/// sign-out.
pub struct SessionManager<A: AuthApi> {
    api: A,
    store: TokenStore,
    state: AuthState,
}

impl<A: AuthApi> SessionManager<A> {
    pub fn new(api: A, store: TokenStore) -> Self {
        Self {
            api,
            store,
            state: AuthState::Unauthenticated,
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// Startup path: load the persisted token and resolve it. A token the
    /// server no longer recognizes is cleared from the store.
    pub async fn restore(&mut self) -> anyhow::Result<()> {
        let Some(token) = self.store.load().await? else {
            self.state = AuthState::Unauthenticated;
            return Ok(());
        };
        match self.api.current_user(&token).await {
            Ok(Some(user)) => {
                info!(user_id = %user.id, "session restored");
                self.state = AuthState::Authenticated { token, user };
            }
            Ok(None) => {
                self.store.clear().await?;
                self.state = AuthState::Unauthenticated;
            }
            Err(e) => {
                warn!(error = %e, "session restore failed");
                self.state = AuthState::Unauthenticated;
            }
        }
        Ok(())
    }

    pub async fn sign_up(
        &mut self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<(), ApiError> {
        self.state = AuthState::Authenticating;
        match self.api.sign_up(email, password, name).await {
            Ok(resp) => self.finish_sign_in(resp).await,
            Err(e) => {
                self.state = AuthState::Unauthenticated;
                Err(e)
            }
        }
    }

    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<(), ApiError> {
        self.state = AuthState::Authenticating;
        match self.api.sign_in(email, password).await {
            Ok(resp) => self.finish_sign_in(resp).await,
            Err(e) => {
                self.state = AuthState::Unauthenticated;
                Err(e)
            }
        }
    }

    async fn finish_sign_in(&mut self, resp: AuthResponse) -> Result<(), ApiError> {
        self.store
            .save(&resp.session_token)
            .await
            .map_err(ApiError::Internal)?;
        self.state = AuthState::Authenticated {
            token: resp.session_token,
            user: resp.user,
        };
        Ok(())
    }

    /// Fail-open: local state is cleared even when the server call fails,
    /// so the user is never stranded looking logged in.
    pub async fn sign_out(&mut self) {
        if let AuthState::Authenticated { token, .. } = &self.state {
            if let Err(e) = self.api.sign_out(token).await {
                warn!(error = %e, "server sign-out failed, clearing local state anyway");
            }
        }
        if let Err(e) = self.store.clear().await {
            warn!(error = %e, "failed to clear session file");
        }
        self.state = AuthState::Unauthenticated;
    }
}
