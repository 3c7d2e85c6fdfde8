//! Authentication module for managing the user session.
//!
//! This module provides:
//! - `AuthSession`: the session state machine and the only writer of
//!   session state
//! - `TokenStore`: durable storage for the opaque bearer credential
//! - `CredentialStore`: optional remember-me login credentials in the OS
//!   keychain
//!
//! The bearer credential is opaque to the client; whether it is still
//! valid is decided by the server, which is why startup goes through
//! `AuthSession::validate` rather than inspecting the stored value.

pub mod credentials;
pub mod session;
pub mod store;

pub use credentials::CredentialStore;
pub use session::{AuthSession, SessionError, SessionState};
pub use store::TokenStore;
