use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized - credential is missing, invalid, or expired")]
    Unauthorized,

    #[error("Request rejected ({status}): {detail}")]
    Rejected { status: u16, detail: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error ({status}): {detail}")]
    Server { status: u16, detail: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Error body shape used by the backend for all non-2xx responses.
/// `detail` is usually a string but is a structured list for validation
/// errors, so it is parsed as a raw value and stringified.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            format!("{}... (truncated, {} total bytes)",
                    &body[..MAX_ERROR_BODY_LENGTH],
                    body.len())
        }
    }

    /// Extract the `detail` field from an error body, falling back to the
    /// truncated raw body when it does not parse.
    fn extract_detail(body: &str) -> String {
        match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => match parsed.detail {
                serde_json::Value::String(detail) => detail,
                other => other.to_string(),
            },
            Err(_) => Self::truncate_body(body),
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let detail = Self::extract_detail(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            404 => ApiError::NotFound(detail),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::Server { status: status.as_u16(), detail },
            400..=499 => ApiError::Rejected { status: status.as_u16(), detail },
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, detail)),
        }
    }

    /// True when the underlying transport failure was a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Network(e) if e.is_timeout())
    }

    /// True when the server could not be reached at all
    pub fn is_connect(&self) -> bool {
        matches!(self, ApiError::Network(e) if e.is_connect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_maps_taxonomy() {
        let body = r#"{"detail": "Incorrect email or password"}"#;
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, body),
            ApiError::Unauthorized
        ));

        match ApiError::from_status(StatusCode::BAD_REQUEST, r#"{"detail": "Email already registered"}"#) {
            ApiError::Rejected { status, detail } => {
                assert_eq!(status, 400);
                assert_eq!(detail, "Email already registered");
            }
            other => panic!("expected Rejected, got {:?}", other),
        }

        assert!(matches!(
            ApiError::from_status(StatusCode::NOT_FOUND, r#"{"detail": "Allergen not found"}"#),
            ApiError::NotFound(detail) if detail == "Allergen not found"
        ));

        assert!(matches!(
            ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, ""),
            ApiError::RateLimited
        ));

        match ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, r#"{"detail": "Failed to fetch allergens"}"#) {
            ApiError::Server { status, detail } => {
                assert_eq!(status, 500);
                assert_eq!(detail, "Failed to fetch allergens");
            }
            other => panic!("expected Server, got {:?}", other),
        }
    }

    #[test]
    fn test_structured_detail_is_stringified() {
        // Validation errors carry a list of objects in `detail`
        let body = r#"{"detail": [{"loc": ["body", "email"], "msg": "value is not a valid email address", "type": "value_error"}]}"#;
        match ApiError::from_status(StatusCode::UNPROCESSABLE_ENTITY, body) {
            ApiError::Rejected { status, detail } => {
                assert_eq!(status, 422);
                assert!(detail.contains("value is not a valid email address"));
            }
            other => panic!("expected Rejected, got {:?}", other),
        }
    }

    #[test]
    fn test_non_json_body_falls_back_to_raw_text() {
        match ApiError::from_status(reqwest::StatusCode::BAD_GATEWAY, "<html>Bad Gateway</html>") {
            ApiError::Server { status, detail } => {
                assert_eq!(status, 502);
                assert_eq!(detail, "<html>Bad Gateway</html>");
            }
            other => panic!("expected Server, got {:?}", other),
        }
    }

    #[test]
    fn test_long_body_is_truncated() {
        let body = "x".repeat(2000);
        match ApiError::from_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR, &body) {
            ApiError::Server { detail, .. } => {
                assert!(detail.len() < 600);
                assert!(detail.contains("truncated, 2000 total bytes"));
            }
            other => panic!("expected Server, got {:?}", other),
        }
    }
}
