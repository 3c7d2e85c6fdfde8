use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Assessment submission: questionnaire answers keyed by question id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkinAssessment {
    pub answers: HashMap<u32, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_concerns: Option<String>,
}

/// Skin profile derived from the assessment. The routine list is only
/// populated by the profile endpoint, not by assessment submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkinProfile {
    pub skin_type: String,
    pub assessment_answers: HashMap<u32, String>,
    pub skin_concerns: Option<String>,
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub routine: Vec<RoutineStep>,
}

/// One step of the personalized care routine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutineStep {
    pub title: String,
    pub description: String,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub step_order: i32,
    /// "morning", "evening", or "both"
    pub time_of_day: String,
}

impl SkinProfile {
    /// Routine steps for the morning, in application order
    pub fn morning_steps(&self) -> Vec<&RoutineStep> {
        self.steps_for(&["morning", "both"])
    }

    /// Routine steps for the evening, in application order
    pub fn evening_steps(&self) -> Vec<&RoutineStep> {
        self.steps_for(&["evening", "both"])
    }

    fn steps_for(&self, times: &[&str]) -> Vec<&RoutineStep> {
        let mut steps: Vec<&RoutineStep> = self
            .routine
            .iter()
            .filter(|s| times.contains(&s.time_of_day.as_str()))
            .collect();
        steps.sort_by_key(|s| s.step_order);
        steps
    }
}

/// Input for product analysis. At least one of the fields must be set;
/// the backend rejects an empty submission.
#[derive(Debug, Clone, Default)]
pub struct ProductSubmission {
    pub product_name: Option<String>,
    pub ingredients: Option<String>,
    pub image: Option<ProductImage>,
}

/// Product photo attached to an analysis request
#[derive(Debug, Clone)]
pub struct ProductImage {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ProductSubmission {
    pub fn is_empty(&self) -> bool {
        self.product_name.is_none() && self.ingredients.is_none() && self.image.is_none()
    }
}

/// Stored result of a product analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductAnalysis {
    pub id: i64,
    pub product_name: Option<String>,
    pub ingredients: Option<String>,
    /// Model-generated analysis; shape varies between the image and text
    /// analysis paths, so this stays untyped.
    pub analysis_result: serde_json::Value,
    pub suitability_score: Option<i32>,
    pub recommendation: Option<String>,
    pub warnings: Option<String>,
    pub created_at: NaiveDateTime,
}
