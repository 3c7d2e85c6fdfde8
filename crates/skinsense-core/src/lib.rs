//! Core library for the SkinSense client.
//!
//! This crate contains everything below the UI layer:
//!
//! - `api`: typed REST client for the SkinSense backend
//! - `auth`: session state machine, token persistence, keychain credentials
//! - `guard`: route-guard decisions derived from session state
//! - `models`: request and response types for the wire format
//! - `config`: on-disk configuration and directory resolution
//!
//! Front-ends construct an [`auth::AuthSession`] around an [`api::ApiClient`]
//! and a [`auth::TokenStore`], call `validate()` on startup, and subscribe to
//! session state changes to drive navigation.

pub mod api;
pub mod auth;
pub mod config;
pub mod guard;
pub mod models;

pub use api::{ApiClient, ApiError};
pub use auth::{AuthSession, CredentialStore, SessionError, SessionState, TokenStore};
pub use config::Config;
pub use guard::{AuthGuard, EntryPoint, GuardOutcome, GuestGuard};
