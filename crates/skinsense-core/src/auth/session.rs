//! The session state machine.
//!
//! `AuthSession` is the single authority for whether the current user is
//! signed in. All sign-in, sign-out, and account-deletion traffic goes
//! through it, and it is the only writer of both the session state and
//! the token store. Everything else observes: snapshot via `state()`,
//! react via `subscribe()`, and make authenticated calls via `api()`.
//!
//! State is a single tagged value, so "authenticated but no user loaded"
//! is unrepresentable. Operations take `&mut self`, so two transitions
//! can never interleave on one session; the `Loading` state is still
//! observable through the watch channel while an operation is waiting on
//! the network.

use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::{ApiClient, ApiError};
use crate::models::{NewAccount, UserProfile};

use super::TokenStore;

/// Where the session currently stands.
///
/// `Unknown` exists only between construction and the first `validate`
/// call; guards treat it exactly like `Loading` so nothing renders as
/// signed out before the stored credential has been checked.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Unknown,
    Loading,
    Authenticated {
        user: UserProfile,
        /// Set on registration, cleared by `complete_onboarding`; drives
        /// the first-run experience
        is_new_user: bool,
    },
    Unauthenticated,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated { .. })
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Unknown | SessionState::Loading)
    }

    /// The signed-in profile, when there is one
    pub fn user(&self) -> Option<&UserProfile> {
        match self {
            SessionState::Authenticated { user, .. } => Some(user),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Already signed in - sign out before switching accounts")]
    AlreadyAuthenticated,

    #[error("Not signed in")]
    NotAuthenticated,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// The session state machine. Construct one per process around an
/// `ApiClient` and a `TokenStore`, then call `validate` before anything
/// else so startup resolves to a definite state.
pub struct AuthSession {
    api: ApiClient,
    store: TokenStore,
    state: watch::Sender<SessionState>,
}

impl AuthSession {
    pub fn new(api: ApiClient, store: TokenStore) -> Self {
        let (state, _) = watch::channel(SessionState::Unknown);
        Self { api, store, state }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Watch for state transitions. Guards re-evaluate on every change,
    /// which is how a mid-session sign-out forces navigation away.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// An authorized client for data calls, only while authenticated.
    /// Data layers that see `ApiError::Unauthorized` from it must hand
    /// control back via [`invalidate`](Self::invalidate).
    pub fn api(&self) -> Option<ApiClient> {
        if self.state.borrow().is_authenticated() {
            Some(self.api.clone())
        } else {
            None
        }
    }

    /// Resolve the stored credential to a definite state at startup.
    ///
    /// With no stored credential this resolves `Unauthenticated` without
    /// touching the network. With one, the profile endpoint decides: any
    /// failure means the credential is not usable right now, so it is
    /// cleared rather than left to fail every subsequent request.
    pub async fn validate(&mut self) -> SessionState {
        let Some(token) = self.store.get() else {
            debug!("No stored credential, skipping validation");
            self.state.send_replace(SessionState::Unauthenticated);
            return self.state();
        };

        self.state.send_replace(SessionState::Loading);

        match self.api.with_token(token.clone()).current_user().await {
            Ok(user) => {
                info!(user = %user.username, "Session restored");
                self.api.set_token(token);
                self.state.send_replace(SessionState::Authenticated {
                    user,
                    is_new_user: false,
                });
            }
            Err(e) => {
                warn!(error = %e, "Stored credential rejected, clearing");
                self.discard_credential();
                self.state.send_replace(SessionState::Unauthenticated);
            }
        }
        self.state()
    }

    /// Sign in with email and password.
    ///
    /// Two round trips: exchange the password for a credential, then load
    /// the profile with it. Nothing is persisted and no transition to
    /// `Authenticated` happens unless both succeed; on failure the error
    /// propagates untouched so the caller can show exactly what the
    /// server said.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<UserProfile, SessionError> {
        if self.state().is_authenticated() {
            return Err(SessionError::AlreadyAuthenticated);
        }

        self.state.send_replace(SessionState::Loading);

        let outcome = async {
            let token = self.api.login(email, password).await?.access_token;
            let user = self.api.with_token(token.clone()).current_user().await?;
            Ok::<_, ApiError>((token, user))
        }
        .await;

        match outcome {
            Ok((token, user)) => {
                self.adopt_credential(&token);
                info!(user = %user.username, "Signed in");
                self.state.send_replace(SessionState::Authenticated {
                    user: user.clone(),
                    is_new_user: false,
                });
                Ok(user)
            }
            Err(e) => {
                self.state.send_replace(SessionState::Unauthenticated);
                Err(e.into())
            }
        }
    }

    /// Create an account and sign in as it. The register endpoint returns
    /// the credential and profile together, so this is one round trip and
    /// the resulting state carries `is_new_user: true` for onboarding.
    pub async fn register(&mut self, account: &NewAccount) -> Result<UserProfile, SessionError> {
        if self.state().is_authenticated() {
            return Err(SessionError::AlreadyAuthenticated);
        }

        self.state.send_replace(SessionState::Loading);

        match self.api.register(account).await {
            Ok(created) => {
                self.adopt_credential(&created.access_token);
                info!(user = %created.user.username, "Account created");
                self.state.send_replace(SessionState::Authenticated {
                    user: created.user.clone(),
                    is_new_user: true,
                });
                Ok(created.user)
            }
            Err(e) => {
                self.state.send_replace(SessionState::Unauthenticated);
                Err(e.into())
            }
        }
    }

    /// Sign out. The server is told best-effort; whatever it answers, the
    /// local credential is cleared and the session ends `Unauthenticated`.
    pub async fn logout(&mut self) {
        if let Err(e) = self.api.logout().await {
            warn!(error = %e, "Remote logout failed, clearing local session anyway");
        }
        self.discard_credential();
        info!("Signed out");
        self.state.send_replace(SessionState::Unauthenticated);
    }

    /// Permanently delete the signed-in account.
    ///
    /// Unlike `logout` this must not pretend: if the server refuses, the
    /// session stays authenticated as before and the error propagates.
    /// Only a confirmed deletion clears local state.
    pub async fn delete_account(&mut self) -> Result<(), SessionError> {
        let prior = self.state();
        if !prior.is_authenticated() {
            return Err(SessionError::NotAuthenticated);
        }

        self.state.send_replace(SessionState::Loading);

        match self.api.delete_account().await {
            Ok(()) => {
                self.discard_credential();
                info!("Account deleted");
                self.state.send_replace(SessionState::Unauthenticated);
                Ok(())
            }
            Err(e) => {
                self.state.send_replace(prior);
                Err(e.into())
            }
        }
    }

    /// Mark onboarding as done, clearing `is_new_user` in place. No-op in
    /// any other state; status and user never change.
    pub fn complete_onboarding(&mut self) {
        if let SessionState::Authenticated {
            user,
            is_new_user: true,
        } = self.state()
        {
            debug!("Onboarding complete");
            self.state.send_replace(SessionState::Authenticated {
                user,
                is_new_user: false,
            });
        }
    }

    /// React to a credential-invalidated signal (a 401 seen by a data
    /// layer): clear the credential and end the session locally. No
    /// network call; the server already rejected us.
    pub fn invalidate(&mut self) {
        info!("Session invalidated, clearing stored credential");
        self.discard_credential();
        self.state.send_replace(SessionState::Unauthenticated);
    }

    fn adopt_credential(&mut self, token: &str) {
        if let Err(e) = self.store.set(token) {
            // The session still works for this run; the user just logs
            // in again next launch
            warn!(error = %e, "Failed to persist credential");
        }
        self.api.set_token(token.to_string());
    }

    fn discard_credential(&mut self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear stored credential");
        }
        self.api.clear_token();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn test_user() -> UserProfile {
        UserProfile {
            id: 1,
            email: "casey@example.com".to_string(),
            username: "casey".to_string(),
            full_name: Some("Casey Park".to_string()),
            is_active: true,
            is_verified: false,
            skin_type: None,
            skin_assessment_answers: None,
            skin_concerns: None,
            created_at: NaiveDate::from_ymd_opt(2026, 1, 15)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_state_predicates() {
        assert!(SessionState::Unknown.is_loading());
        assert!(SessionState::Loading.is_loading());
        assert!(!SessionState::Unauthenticated.is_loading());

        let authed = SessionState::Authenticated {
            user: test_user(),
            is_new_user: false,
        };
        assert!(authed.is_authenticated());
        assert!(!authed.is_loading());
        assert_eq!(authed.user().map(|u| u.username.as_str()), Some("casey"));
        assert_eq!(SessionState::Unauthenticated.user(), None);
    }

    #[tokio::test]
    async fn test_new_session_starts_unknown() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let api = ApiClient::new("http://localhost:8000").expect("Failed to build client");
        let session = AuthSession::new(api, TokenStore::new(dir.path().to_path_buf()));

        assert_eq!(session.state(), SessionState::Unknown);
        // No authorized client before the first validate resolves
        assert!(session.api().is_none());
    }

    #[tokio::test]
    async fn test_complete_onboarding_outside_onboarding_is_noop() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let api = ApiClient::new("http://localhost:8000").expect("Failed to build client");
        let mut session = AuthSession::new(api, TokenStore::new(dir.path().to_path_buf()));

        session.complete_onboarding();
        assert_eq!(session.state(), SessionState::Unknown);
    }
}
