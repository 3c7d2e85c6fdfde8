//! Route guards.
//!
//! A guard maps the current [`SessionState`] to exactly one outcome for
//! a protected surface: keep showing a loading view, mount the content,
//! or redirect to the named entry point. The matches are exhaustive and
//! there is no permissive fallback, so an unresolved session can never
//! flash protected content.
//!
//! Guards are pure; callers re-run them on every state change observed
//! through [`AuthSession::subscribe`](crate::AuthSession::subscribe).

use crate::auth::SessionState;

/// Navigation targets a guard can redirect to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPoint {
    /// The signed-out landing surface (welcome, sign-in, sign-up)
    Welcome,
    /// The signed-in home surface
    Home,
}

/// What a guard decided for the current state
#[derive(Debug, Clone, PartialEq)]
pub enum GuardOutcome {
    /// Session not resolved yet, keep the loading view up
    Loading,
    /// State admits this surface, render it
    Mount,
    /// State forbids this surface, navigate away
    Redirect(EntryPoint),
}

/// Guards surfaces that require a signed-in user
pub struct AuthGuard;

impl AuthGuard {
    pub fn evaluate(state: &SessionState) -> GuardOutcome {
        match state {
            SessionState::Unknown | SessionState::Loading => GuardOutcome::Loading,
            SessionState::Authenticated { .. } => GuardOutcome::Mount,
            SessionState::Unauthenticated => GuardOutcome::Redirect(EntryPoint::Welcome),
        }
    }
}

/// Guards surfaces meant only for signed-out users
pub struct GuestGuard;

impl GuestGuard {
    pub fn evaluate(state: &SessionState) -> GuardOutcome {
        match state {
            SessionState::Unknown | SessionState::Loading => GuardOutcome::Loading,
            SessionState::Authenticated { .. } => GuardOutcome::Redirect(EntryPoint::Home),
            SessionState::Unauthenticated => GuardOutcome::Mount,
        }
    }
}
