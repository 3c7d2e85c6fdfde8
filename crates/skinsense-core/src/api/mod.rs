//! REST API client module for the SkinSense backend.
//!
//! This module provides the `ApiClient` for communicating with the
//! backend to authenticate users and fetch skin-analysis, chat, and
//! skin-memory data.
//!
//! The API uses opaque bearer tokens obtained through the login and
//! register endpoints. A 401 from any authenticated endpoint means the
//! token is no longer valid and the session must be invalidated.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
