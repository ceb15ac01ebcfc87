use std::sync::Arc;

use crate::auth::normalizer::AuthGrant;
use crate::error::ClientResult;
use crate::models::User;
use crate::storage::{self, LocalStorage};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Anonymous,
    /// A login/registration is in flight, or a stored token is being checked
    /// (`stored_token` is set only in the latter case).
    Authenticating { stored_token: Option<String> },
    Authenticated { user: User, token: String },
    AuthFailed { reason: String },
}

#[derive(Debug, Clone)]
pub enum SessionAction {
    /// Login or registration submitted.
    Submit,
    Succeeded(AuthGrant),
    Failed(String),
    /// The stored token was accepted and resolved to this user.
    Restored(User),
    RestoreFailed,
    Logout,
}

/// Change to the persisted token requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenEffect {
    Persist(String),
    Clear,
}

/// Flat view of the session for display code.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Session {
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl SessionState {
    /// Starting state: a persisted token means we are checking it.
    pub fn initial(stored_token: Option<String>) -> Self {
        match stored_token {
            Some(token) => SessionState::Authenticating {
                stored_token: Some(token),
            },
            None => SessionState::Anonymous,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated { .. })
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Authenticated { user, .. } => Some(user),
            _ => None,
        }
    }

    pub fn session(&self) -> Session {
        match self {
            SessionState::Anonymous => Session::default(),
            SessionState::Authenticating { .. } => Session {
                is_loading: true,
                ..Session::default()
            },
            SessionState::Authenticated { user, token } => Session {
                user: Some(user.clone()),
                token: Some(token.clone()),
                is_authenticated: true,
                ..Session::default()
            },
            SessionState::AuthFailed { reason } => Session {
                error: Some(reason.clone()),
                ..Session::default()
            },
        }
    }
}

/// Pure transition function. Actions that make no sense in the current state
/// leave it unchanged.
pub fn reduce(state: &SessionState, action: SessionAction) -> (SessionState, Option<TokenEffect>) {
    use SessionAction as A;
    use SessionState as S;

    match (state, action) {
        (S::Anonymous | S::AuthFailed { .. }, A::Submit) => {
            (S::Authenticating { stored_token: None }, None)
        }
        (S::Authenticating { stored_token: None }, A::Succeeded(grant)) => {
            let effect = TokenEffect::Persist(grant.token.clone());
            (
                S::Authenticated {
                    user: grant.user,
                    token: grant.token,
                },
                Some(effect),
            )
        }
        (S::Authenticating { stored_token: None }, A::Failed(reason)) => {
            (S::AuthFailed { reason }, None)
        }
        (
            S::Authenticating {
                stored_token: Some(token),
            },
            A::Restored(user),
        ) => (
            S::Authenticated {
                user,
                token: token.clone(),
            },
            None,
        ),
        (
            S::Authenticating {
                stored_token: Some(_),
            },
            A::RestoreFailed,
        ) => (S::Anonymous, Some(TokenEffect::Clear)),
        (_, A::Logout) => (S::Anonymous, Some(TokenEffect::Clear)),
        (state, action) => {
            tracing::warn!("Ignoring session action {action:?} in state {state:?}");
            (state.clone(), None)
        }
    }
}

/// Process-wide session container. Owns the state and applies token effects
/// to persistent storage.
pub struct SessionStore {
    state: SessionState,
    storage: Arc<dyn LocalStorage>,
}

impl SessionStore {
    pub fn load(storage: Arc<dyn LocalStorage>) -> ClientResult<Self> {
        let stored = storage::load_token(storage.as_ref())?;
        Ok(Self {
            state: SessionState::initial(stored),
            storage,
        })
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn session(&self) -> Session {
        self.state.session()
    }

    /// Token waiting to be checked against `/auth/me`, if any.
    pub fn pending_restore(&self) -> Option<&str> {
        match &self.state {
            SessionState::Authenticating {
                stored_token: Some(token),
            } => Some(token),
            _ => None,
        }
    }

    pub fn dispatch(&mut self, action: SessionAction) -> ClientResult<&SessionState> {
        let (next, effect) = reduce(&self.state, action);
        match effect {
            Some(TokenEffect::Persist(token)) => {
                let prefix: String = token.chars().take(8).collect();
                tracing::debug!("Persisting session token {prefix}...");
                storage::save_token(self.storage.as_ref(), &token)?;
            }
            Some(TokenEffect::Clear) => {
                tracing::debug!("Clearing persisted session token");
                storage::clear_token(self.storage.as_ref())?;
            }
            None => {}
        }
        self.state = next;
        Ok(&self.state)
    }
}
