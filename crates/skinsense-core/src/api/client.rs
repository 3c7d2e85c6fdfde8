//! API client for communicating with the SkinSense REST backend.
//!
//! This module provides the `ApiClient` struct for making authenticated
//! requests to the auth, skin-analysis, chat, and skin-memory endpoints.

use std::time::Duration;

use futures::{stream, StreamExt};
use reqwest::{multipart, Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::{
    Allergen, AllergenUpdate, ChatMessage, ChatSession, ChatSessionSummary, IssueReport,
    IssueStatus, MemoryEntry, MemorySummary, NewAccount, NewAllergen, NewSkinIssue,
    ProductAnalysis, ProductSubmission, ProfileUpdate, ReactionReport, RegisteredAccount,
    SkinAssessment, SkinIssue, SkinIssueUpdate, SkinProfile, TokenResponse, UserProfile,
};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Path prefix for all versioned API routes; only the health probe lives
/// at the host root.
const API_PREFIX: &str = "/api/v1";

/// HTTP request timeout in seconds.
/// 30s allows for slow model-backed analysis responses while still failing
/// fast enough that the session never hangs in a loading state.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for rate-limited (429) requests.
/// 3 retries with exponential backoff usually succeeds without excessive delay.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
/// 1 second is polite to the server while not making users wait too long.
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Concurrency cap for chat transcript hydration.
/// 10 parallel requests keeps history loads fast without flooding the server.
const MAX_CONCURRENT_REQUESTS: usize = 10;

/// API client for the SkinSense backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client for the given base URL
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Set the bearer token for authenticated requests
    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    /// Drop the bearer token, returning the client to anonymous requests
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// Create a new ApiClient with the given token, sharing the connection pool.
    /// This is more efficient than creating a new client for each request.
    pub fn with_token(&self, token: String) -> Self {
        Self {
            client: self.client.clone(), // Cheap clone, shares connection pool
            base_url: self.base_url.clone(),
            token: Some(token),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let mut request = self.client.request(method, url);
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }
        request
    }

    /// Check if response is successful, returning an error with body if not.
    /// Returns Ok(Some(response)) for success, Ok(None) for rate limit (should retry),
    /// or Err for other errors.
    async fn check_response_for_retry(
        response: reqwest::Response,
    ) -> Result<Option<reqwest::Response>, ApiError> {
        if response.status().is_success() {
            Ok(Some(response))
        } else if response.status().as_u16() == 429 {
            // Rate limited - signal to retry
            Ok(None)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Send a request, retrying with exponential backoff while rate limited
    async fn dispatch(
        &self,
        request: RequestBuilder,
        path: &str,
    ) -> Result<reqwest::Response, ApiError> {
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let attempt = request
                .try_clone()
                .ok_or_else(|| ApiError::InvalidResponse(format!("Request to {} cannot be retried", path)))?;
            let response = attempt.send().await?;

            match Self::check_response_for_retry(response).await? {
                Some(response) => return Ok(response),
                None => {
                    // Rate limited
                    retries += 1;
                    if retries > MAX_RATE_LIMIT_RETRIES {
                        return Err(ApiError::RateLimited);
                    }
                    warn!(path = path, retry = retries, backoff_ms = backoff_ms, "Rate limited, backing off");
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms *= 2; // Exponential backoff
                }
            }
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        path: &str,
    ) -> Result<T, ApiError> {
        let response = self.dispatch(request, path).await?;
        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response from {}: {}", path, e)))
    }

    async fn execute_unit(&self, request: RequestBuilder, path: &str) -> Result<(), ApiError> {
        self.dispatch(request, path).await?;
        Ok(())
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(self.request(Method::GET, &self.url(path)), path).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        self.execute(self.request(Method::POST, &self.url(path)).json(body), path).await
    }

    async fn put<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        self.execute(self.request(Method::PUT, &self.url(path)).json(body), path).await
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute_unit(self.request(Method::DELETE, &self.url(path)), path).await
    }

    // ===== Health =====

    /// Probe the server root; returns the banner message on success
    pub async fn health(&self) -> Result<String, ApiError> {
        #[derive(Deserialize)]
        struct Banner {
            message: String,
        }

        let url = format!("{}/", self.base_url);
        let banner: Banner = self.execute(self.client.get(&url), "/").await?;
        Ok(banner.message)
    }

    // ===== Auth =====

    /// Create an account; returns the credential and profile in one round trip
    pub async fn register(&self, account: &NewAccount) -> Result<RegisteredAccount, ApiError> {
        self.post("/auth/register", account).await
    }

    /// Exchange email and password for a bearer credential
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, ApiError> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
        });
        self.post("/auth/login", &body).await
    }

    /// Fetch the profile of the account the current token belongs to
    pub async fn current_user(&self) -> Result<UserProfile, ApiError> {
        self.get("/auth/me").await
    }

    /// Tell the server the session is over. The response body carries only
    /// a farewell message and is discarded.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let path = "/auth/logout";
        self.execute_unit(self.request(Method::POST, &self.url(path)), path).await
    }

    /// Permanently delete the account the current token belongs to
    pub async fn delete_account(&self) -> Result<(), ApiError> {
        self.delete("/auth/delete-account").await
    }

    /// Update profile fields; returns the refreshed profile
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, ApiError> {
        self.put("/auth/profile", update).await
    }

    /// Change the account password
    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ApiError> {
        let path = "/auth/change-password";
        let body = serde_json::json!({
            "current_password": current_password,
            "new_password": new_password,
        });
        self.execute_unit(self.request(Method::PUT, &self.url(path)).json(&body), path).await
    }

    // ===== Skin Analysis =====

    /// Submit the assessment questionnaire; returns the derived skin profile
    pub async fn submit_assessment(&self, assessment: &SkinAssessment) -> Result<SkinProfile, ApiError> {
        self.post("/skin/assessment", assessment).await
    }

    /// Fetch the skin profile including the personalized routine
    pub async fn skin_profile(&self) -> Result<SkinProfile, ApiError> {
        self.get("/skin/profile").await
    }

    /// Analyze a product for the user's skin type. Multipart uploads cannot
    /// be replayed, so this path sends once without the rate-limit retry loop.
    pub async fn analyze_product(&self, submission: &ProductSubmission) -> Result<ProductAnalysis, ApiError> {
        let path = "/skin/analyze-product";

        let mut form = multipart::Form::new();
        if let Some(ref name) = submission.product_name {
            form = form.text("product_name", name.clone());
        }
        if let Some(ref ingredients) = submission.ingredients {
            form = form.text("ingredients", ingredients.clone());
        }
        if let Some(ref image) = submission.image {
            let part = multipart::Part::bytes(image.bytes.clone())
                .file_name(image.file_name.clone())
                .mime_str(&image.content_type)?;
            form = form.part("product_image", part);
        }

        let response = self
            .request(Method::POST, &self.url(path))
            .multipart(form)
            .send()
            .await?;
        let response = Self::check_response(response).await?;

        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response from {}: {}", path, e)))
    }

    /// Fetch previous product analyses, newest first
    pub async fn analyses(&self, skip: u32, limit: u32) -> Result<Vec<ProductAnalysis>, ApiError> {
        self.get(&format!("/skin/analyses?skip={}&limit={}", skip, limit)).await
    }

    /// Delete a single stored analysis
    pub async fn delete_analysis(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/skin/analyses/{}", id)).await
    }

    /// Delete all stored analyses
    pub async fn delete_all_analyses(&self) -> Result<(), ApiError> {
        self.delete("/skin/analyses").await
    }

    // ===== Chat =====

    /// Start a new advisor chat session
    pub async fn create_chat_session(&self, title: Option<&str>) -> Result<ChatSession, ApiError> {
        let body = serde_json::json!({ "title": title });
        self.post("/chat/sessions", &body).await
    }

    /// List chat sessions with message counts and previews, newest first
    pub async fn chat_sessions(&self, skip: u32, limit: u32) -> Result<Vec<ChatSessionSummary>, ApiError> {
        self.get(&format!("/chat/sessions?skip={}&limit={}", skip, limit)).await
    }

    /// Fetch one chat session with its full transcript
    pub async fn chat_session(&self, id: Uuid) -> Result<ChatSession, ApiError> {
        self.get(&format!("/chat/sessions/{}", id)).await
    }

    /// Send a message to a session; returns the assistant's reply
    pub async fn send_chat_message(&self, session_id: Uuid, message: &str) -> Result<ChatMessage, ApiError> {
        let body = serde_json::json!({ "message": message });
        self.post(&format!("/chat/sessions/{}/messages", session_id), &body).await
    }

    /// Delete a chat session and its transcript
    pub async fn delete_chat_session(&self, id: Uuid) -> Result<(), ApiError> {
        self.delete(&format!("/chat/sessions/{}", id)).await
    }

    /// Fetch recent sessions with transcripts hydrated in parallel.
    /// Individual transcript failures are logged and skipped so one bad
    /// session does not lose the rest of the history.
    pub async fn chat_history(&self, limit: u32) -> Result<Vec<ChatSession>, ApiError> {
        let summaries = self.chat_sessions(0, limit).await?;
        let ids: Vec<Uuid> = summaries.iter().map(|s| s.id).collect();
        debug!(count = ids.len(), "Hydrating chat transcripts");

        let mut sessions: Vec<ChatSession> = stream::iter(ids)
            .map(|id| {
                let client = self.clone();
                async move { client.chat_session(id).await }
            })
            .buffer_unordered(MAX_CONCURRENT_REQUESTS)
            .filter_map(|result| async move {
                match result {
                    Ok(session) => Some(session),
                    Err(e) => {
                        warn!(error = %e, "Chat transcript fetch failed");
                        None
                    }
                }
            })
            .collect()
            .await;

        sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(sessions)
    }

    // ===== Skin Memory =====

    /// Fetch the aggregated skin memory overview
    pub async fn memory_summary(&self) -> Result<MemorySummary, ApiError> {
        self.get("/skin-memory/summary").await
    }

    /// List tracked allergens
    pub async fn allergens(&self) -> Result<Vec<Allergen>, ApiError> {
        self.get("/skin-memory/allergens").await
    }

    /// Track a new allergen
    pub async fn add_allergen(&self, allergen: &NewAllergen) -> Result<Allergen, ApiError> {
        self.post("/skin-memory/allergens", allergen).await
    }

    /// Update a tracked allergen
    pub async fn update_allergen(&self, id: i64, update: &AllergenUpdate) -> Result<Allergen, ApiError> {
        self.put(&format!("/skin-memory/allergens/{}", id), update).await
    }

    /// Permanently remove a tracked allergen
    pub async fn delete_allergen(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/skin-memory/allergens/{}", id)).await
    }

    /// List tracked skin issues
    pub async fn skin_issues(&self) -> Result<Vec<SkinIssue>, ApiError> {
        self.get("/skin-memory/issues").await
    }

    /// Track a new skin issue
    pub async fn add_skin_issue(&self, issue: &NewSkinIssue) -> Result<SkinIssue, ApiError> {
        self.post("/skin-memory/issues", issue).await
    }

    /// Update a tracked skin issue
    pub async fn update_skin_issue(&self, id: i64, update: &SkinIssueUpdate) -> Result<SkinIssue, ApiError> {
        self.put(&format!("/skin-memory/issues/{}", id), update).await
    }

    /// Move an issue through its lifecycle; returns the updated issue
    pub async fn update_issue_status(&self, id: i64, status: IssueStatus) -> Result<SkinIssue, ApiError> {
        let body = serde_json::json!({ "status": status });
        self.put(&format!("/skin-memory/issues/{}/status", id), &body).await
    }

    /// Permanently remove a tracked skin issue
    pub async fn delete_skin_issue(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/skin-memory/issues/{}", id)).await
    }

    /// Fetch memory entries, optionally filtered by entry type
    pub async fn memories(&self, entry_type: Option<&str>, limit: u32) -> Result<Vec<MemoryEntry>, ApiError> {
        let mut path = format!("/skin-memory/memories?limit={}", limit);
        if let Some(entry_type) = entry_type {
            path = format!("{}&entry_type={}", path, entry_type);
        }
        self.get(&path).await
    }

    /// Permanently remove one memory entry
    pub async fn delete_memory(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/skin-memory/memories/{}", id)).await
    }

    /// Permanently remove all memory entries, optionally only one entry
    /// type; returns how many were removed
    pub async fn delete_all_memories(&self, entry_type: Option<&str>) -> Result<u64, ApiError> {
        #[derive(Deserialize)]
        struct Deleted {
            deleted_count: u64,
        }

        let mut path = String::from("/skin-memory/memories");
        if let Some(entry_type) = entry_type {
            path = format!("{}?entry_type={}", path, entry_type);
        }
        let deleted: Deleted = self
            .execute(self.request(Method::DELETE, &self.url(&path)), &path)
            .await?;
        Ok(deleted.deleted_count)
    }

    /// Report an allergic reaction; returns the allergen record it created
    /// or updated
    pub async fn report_reaction(&self, report: &ReactionReport) -> Result<Allergen, ApiError> {
        #[derive(Deserialize)]
        struct Reported {
            allergen: Allergen,
        }

        let reported: Reported = self.post("/skin-memory/report/reaction", report).await?;
        Ok(reported.allergen)
    }

    /// Report a new skin issue; returns the issue record it created
    pub async fn report_issue(&self, report: &IssueReport) -> Result<SkinIssue, ApiError> {
        #[derive(Deserialize)]
        struct Reported {
            issue: SkinIssue,
        }

        let reported: Reported = self.post("/skin-memory/report/issue", report).await?;
        Ok(reported.issue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_prefix() {
        let client = ApiClient::new("http://localhost:8000").expect("Failed to build client");
        assert_eq!(client.url("/auth/me"), "http://localhost:8000/api/v1/auth/me");
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = ApiClient::new("https://api.skinsense.example/").expect("Failed to build client");
        assert_eq!(
            client.url("/chat/sessions"),
            "https://api.skinsense.example/api/v1/chat/sessions"
        );
    }

    #[test]
    fn test_with_token_keeps_base_url() {
        let client = ApiClient::new("http://localhost:8000").expect("Failed to build client");
        let authed = client.with_token("tok".to_string());
        assert_eq!(authed.url("/auth/me"), client.url("/auth/me"));
        assert!(authed.token.is_some());
        assert!(client.token.is_none());
    }
}
