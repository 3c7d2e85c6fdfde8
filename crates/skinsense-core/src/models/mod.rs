//! Data models for the SkinSense wire format.
//!
//! This module contains all the data structures exchanged with the
//! backend, grouped by domain:
//!
//! - `user`: accounts, credentials, and the signed-in profile
//! - `skin`: assessment, skin profile, routine steps, product analyses
//! - `chat`: advisor chat sessions and messages
//! - `memory`: tracked allergens, skin issues, and memory entries
//!
//! The backend speaks snake_case JSON with naive UTC timestamps, so
//! fields map directly and datetimes use `chrono::NaiveDateTime`.

pub mod chat;
pub mod memory;
pub mod skin;
pub mod user;

pub use chat::{ChatMessage, ChatSession, ChatSessionSummary};
pub use memory::{
    Allergen, AllergenUpdate, IssueReport, IssueStatus, MemoryEntry, MemorySummary, NewAllergen,
    NewSkinIssue, ReactionReport, Severity, SkinIssue, SkinIssueUpdate,
};
pub use skin::{ProductAnalysis, ProductImage, ProductSubmission, RoutineStep, SkinAssessment, SkinProfile};
pub use user::{NewAccount, ProfileUpdate, RegisteredAccount, TokenResponse, UserProfile};
