use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// The signed-in account as returned by `/auth/me` and embedded in the
/// register response. Skin fields are populated once the user has
/// completed the assessment questionnaire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub is_verified: bool,
    pub skin_type: Option<String>,
    /// Raw questionnaire answers as stored server-side; shape varies with
    /// the questionnaire version, so this stays untyped.
    #[serde(default)]
    pub skin_assessment_answers: Option<serde_json::Value>,
    pub skin_concerns: Option<String>,
    pub created_at: NaiveDateTime,
}

impl UserProfile {
    /// Name to show in greetings: full name when set, username otherwise
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.username)
    }

    /// Whether the user still needs to complete the skin assessment
    pub fn needs_assessment(&self) -> bool {
        self.skin_type.is_none()
    }
}

/// Registration request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAccount {
    pub email: String,
    pub username: String,
    pub full_name: Option<String>,
    pub password: String,
}

/// Login response: the bearer credential for subsequent requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Register response: credential and the freshly created account in one
/// round trip, so no follow-up profile fetch is needed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredAccount {
    pub access_token: String,
    pub user: UserProfile,
}

/// Partial update for `/auth/profile`; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user_profile() {
        let json = r#"{
            "email": "casey@example.com",
            "username": "casey",
            "full_name": "Casey Park",
            "id": 7,
            "is_active": true,
            "is_verified": false,
            "skin_type": "combination",
            "skin_assessment_answers": {"1": "Tight and dry", "2": "Sometimes"},
            "skin_concerns": "acne, dark spots",
            "created_at": "2025-11-02T18:30:12.451098"
        }"#;

        let user: UserProfile = serde_json::from_str(json).expect("Failed to parse user profile");
        assert_eq!(user.id, 7);
        assert_eq!(user.display_name(), "Casey Park");
        assert!(!user.needs_assessment());
        assert_eq!(user.skin_type.as_deref(), Some("combination"));
        assert!(user.created_at.and_utc().timestamp() > 0);
    }

    #[test]
    fn test_parse_user_profile_before_assessment() {
        let json = r#"{
            "email": "new@example.com",
            "username": "newuser",
            "full_name": null,
            "id": 8,
            "is_active": true,
            "is_verified": false,
            "skin_type": null,
            "skin_assessment_answers": null,
            "skin_concerns": null,
            "created_at": "2026-01-15T09:00:00"
        }"#;

        let user: UserProfile = serde_json::from_str(json).expect("Failed to parse user profile");
        assert_eq!(user.display_name(), "newuser");
        assert!(user.needs_assessment());
    }

    #[test]
    fn test_profile_update_skips_absent_fields() {
        let update = ProfileUpdate {
            full_name: Some("Casey P.".to_string()),
            username: None,
        };
        let json = serde_json::to_string(&update).expect("Failed to serialize update");
        assert!(json.contains("full_name"));
        assert!(!json.contains("username"));
    }
}
