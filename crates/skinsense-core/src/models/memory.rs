//! Skin-memory types: the backend's long-term record of what the user's
//! skin reacts to, built up from product analyses, chat, and explicit
//! reports.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Reaction severity for allergens and reaction reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Mild => write!(f, "mild"),
            Severity::Moderate => write!(f, "moderate"),
            Severity::Severe => write!(f, "severe"),
        }
    }
}

/// Lifecycle of a tracked skin issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueStatus {
    Active,
    Improving,
    Resolved,
}

impl std::fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueStatus::Active => write!(f, "active"),
            IssueStatus::Improving => write!(f, "improving"),
            IssueStatus::Resolved => write!(f, "resolved"),
        }
    }
}

/// An ingredient the user is known or suspected to react to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Allergen {
    pub id: i64,
    pub user_id: i64,
    pub ingredient_name: String,
    pub severity: Severity,
    /// Confirmed by an actual reaction rather than inferred
    pub confirmed: bool,
    pub notes: Option<String>,
    pub first_detected: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAllergen {
    pub ingredient_name: String,
    pub severity: Severity,
    pub confirmed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NewAllergen {
    pub fn new(ingredient_name: impl Into<String>) -> Self {
        Self {
            ingredient_name: ingredient_name.into(),
            severity: Severity::Mild,
            confirmed: false,
            notes: None,
        }
    }
}

/// Partial allergen update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AllergenUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredient_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A tracked skin issue, from first report to resolution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkinIssue {
    pub id: i64,
    pub user_id: i64,
    pub issue_type: String,
    pub description: Option<String>,
    /// 1 (minor) through 10 (severe)
    pub severity: i32,
    pub status: IssueStatus,
    pub triggers: Option<Vec<String>>,
    pub first_reported: NaiveDateTime,
    pub last_updated: NaiveDateTime,
    pub resolved_date: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSkinIssue {
    pub issue_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub severity: i32,
    pub status: IssueStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub triggers: Option<Vec<String>>,
}

impl NewSkinIssue {
    pub fn new(issue_type: impl Into<String>) -> Self {
        Self {
            issue_type: issue_type.into(),
            description: None,
            severity: 1,
            status: IssueStatus::Active,
            triggers: None,
        }
    }
}

/// Partial issue update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkinIssueUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<IssueStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub triggers: Option<Vec<String>>,
}

/// One entry in the longitudinal skin memory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryEntry {
    pub id: i64,
    pub user_id: i64,
    /// Category tag such as "reaction_report" or "issue_report"
    pub entry_type: String,
    pub content: String,
    #[serde(default)]
    pub entry_metadata: Option<serde_json::Value>,
    pub source: Option<String>,
    /// 1 (routine) through 5 (critical)
    pub importance: i32,
    pub created_at: NaiveDateTime,
    pub is_active: bool,
}

/// Aggregated overview of allergens and issues. The aggregate shapes are
/// produced ad hoc server-side, so they stay untyped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemorySummary {
    pub allergens: serde_json::Value,
    pub skin_issues: serde_json::Value,
    pub recommendations: Vec<String>,
}

/// Report of an allergic reaction to a specific ingredient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionReport {
    pub ingredient_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    pub reaction_description: String,
    pub severity: Severity,
}

/// Report of a new skin issue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueReport {
    pub issue_type: String,
    pub description: String,
    /// 1 (minor) through 10 (severe)
    pub severity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub triggers: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affected_areas: Option<Vec<String>>,
}
