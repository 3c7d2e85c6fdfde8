//! Integration tests for the session state machine using a wiremock server.
//!
//! These cover the full credential lifecycle: cold start, sign-in,
//! sign-up with onboarding, stored-credential validation, sign-out, and
//! account deletion, plus how guards react to the transitions.

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{any, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use skinsense_core::{
    ApiClient, ApiError, AuthGuard, AuthSession, EntryPoint, GuardOutcome, SessionError,
    SessionState, TokenStore,
};

fn user_json() -> serde_json::Value {
    json!({
        "id": 1,
        "email": "casey@example.com",
        "username": "casey",
        "full_name": "Casey Park",
        "is_active": true,
        "is_verified": false,
        "skin_type": "combination",
        "skin_assessment_answers": null,
        "skin_concerns": null,
        "created_at": "2026-01-15T09:00:00.482301"
    })
}

fn session_against(url: &str, dir: &TempDir) -> AuthSession {
    let api = ApiClient::new(url).expect("Failed to build client");
    AuthSession::new(api, TokenStore::new(dir.path().to_path_buf()))
}

/// A second handle on the same credential file, for asserting what the
/// session actually persisted
fn stored_token(dir: &TempDir) -> Option<String> {
    TokenStore::new(dir.path().to_path_buf()).get()
}

#[tokio::test]
async fn test_cold_start_without_credential_stays_offline() {
    let mock_server = MockServer::start().await;

    // No stored credential means no request of any kind
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut session = session_against(&mock_server.uri(), &dir);

    assert_eq!(session.state(), SessionState::Unknown);
    let resolved = session.validate().await;

    assert_eq!(resolved, SessionState::Unauthenticated);
    assert!(session.api().is_none());
}

#[tokio::test]
async fn test_login_persists_credential_and_loads_profile() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .and(body_string_contains("casey@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-1",
            "token_type": "bearer"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/me"))
        .and(header("Authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut session = session_against(&mock_server.uri(), &dir);

    let user = session
        .login("casey@example.com", "hunter2")
        .await
        .expect("Login should succeed");

    assert_eq!(user.username, "casey");
    assert_eq!(
        session.state(),
        SessionState::Authenticated {
            user,
            is_new_user: false
        }
    );
    assert_eq!(stored_token(&dir).as_deref(), Some("tok-1"));
    assert!(session.api().is_some());
}

#[tokio::test]
async fn test_rejected_login_leaves_no_session_behind() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Incorrect email or password"
        })))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut session = session_against(&mock_server.uri(), &dir);

    let result = session.login("casey@example.com", "wrong").await;

    assert!(matches!(
        result,
        Err(SessionError::Api(ApiError::Unauthorized))
    ));
    assert_eq!(session.state(), SessionState::Unauthenticated);
    assert_eq!(stored_token(&dir), None);
    assert!(session.api().is_none());
}

#[tokio::test]
async fn test_login_while_signed_in_is_refused() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-1",
            "token_type": "bearer"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut session = session_against(&mock_server.uri(), &dir);

    session
        .login("casey@example.com", "hunter2")
        .await
        .expect("Login should succeed");
    let before = session.state();

    let second = session.login("other@example.com", "hunter2").await;

    assert!(matches!(second, Err(SessionError::AlreadyAuthenticated)));
    assert_eq!(session.state(), before);
}

#[tokio::test]
async fn test_register_enters_onboarding_in_one_round_trip() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/register"))
        .and(body_string_contains("casey@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh-tok",
            "token_type": "bearer",
            "user": user_json()
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Registration already returns the profile, so no profile fetch
    Mock::given(method("GET"))
        .and(path("/api/v1/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut session = session_against(&mock_server.uri(), &dir);

    let account = skinsense_core::models::NewAccount {
        email: "casey@example.com".to_string(),
        username: "casey".to_string(),
        full_name: Some("Casey Park".to_string()),
        password: "hunter2".to_string(),
    };
    let user = session
        .register(&account)
        .await
        .expect("Registration should succeed");

    assert_eq!(
        session.state(),
        SessionState::Authenticated {
            user: user.clone(),
            is_new_user: true
        }
    );
    assert_eq!(stored_token(&dir).as_deref(), Some("fresh-tok"));

    // Finishing onboarding flips the flag and nothing else
    session.complete_onboarding();
    assert_eq!(
        session.state(),
        SessionState::Authenticated {
            user,
            is_new_user: false
        }
    );

    // Repeat calls change nothing
    let settled = session.state();
    session.complete_onboarding();
    assert_eq!(session.state(), settled);
}

#[tokio::test]
async fn test_validate_restores_stored_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/me"))
        .and(header("Authorization", "Bearer stored-tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = TokenStore::new(dir.path().to_path_buf());
    store.set("stored-tok").expect("Failed to seed credential");

    let api = ApiClient::new(&mock_server.uri()).expect("Failed to build client");
    let mut session = AuthSession::new(api, store);

    let resolved = session.validate().await;

    assert!(resolved.is_authenticated());
    assert_eq!(resolved.user().map(|u| u.username.as_str()), Some("casey"));
    assert!(session.api().is_some());
}

#[tokio::test]
async fn test_validate_clears_rejected_credential() {
    let mock_server = MockServer::start().await;

    // Exactly one request: the second validate must not hit the network
    Mock::given(method("GET"))
        .and(path("/api/v1/auth/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Could not validate credentials"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = TokenStore::new(dir.path().to_path_buf());
    store.set("expired-tok").expect("Failed to seed credential");

    let api = ApiClient::new(&mock_server.uri()).expect("Failed to build client");
    let mut session = AuthSession::new(api, store);

    assert_eq!(session.validate().await, SessionState::Unauthenticated);
    assert_eq!(stored_token(&dir), None);

    assert_eq!(session.validate().await, SessionState::Unauthenticated);
}

#[tokio::test]
async fn test_logout_clears_locally_even_when_server_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-1",
            "token_type": "bearer"
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/logout"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "detail": "Session store unavailable"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut session = session_against(&mock_server.uri(), &dir);
    session
        .login("casey@example.com", "hunter2")
        .await
        .expect("Login should succeed");

    session.logout().await;

    assert_eq!(session.state(), SessionState::Unauthenticated);
    assert_eq!(stored_token(&dir), None);
    assert!(session.api().is_none());
}

#[tokio::test]
async fn test_logout_clears_locally_when_server_unreachable() {
    // Nothing listens here; the remote call fails at connect
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = TokenStore::new(dir.path().to_path_buf());
    store.set("orphan-tok").expect("Failed to seed credential");

    let api = ApiClient::new("http://127.0.0.1:9").expect("Failed to build client");
    let mut session = AuthSession::new(api, store);

    session.logout().await;

    assert_eq!(session.state(), SessionState::Unauthenticated);
    assert_eq!(stored_token(&dir), None);
}

#[tokio::test]
async fn test_failed_account_deletion_preserves_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-1",
            "token_type": "bearer"
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/auth/delete-account"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "detail": "Failed to delete account"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut session = session_against(&mock_server.uri(), &dir);
    session
        .login("casey@example.com", "hunter2")
        .await
        .expect("Login should succeed");
    let before = session.state();

    let result = session.delete_account().await;

    assert!(matches!(
        result,
        Err(SessionError::Api(ApiError::Server { status: 500, .. }))
    ));
    assert_eq!(session.state(), before);
    assert_eq!(stored_token(&dir).as_deref(), Some("tok-1"));
}

#[tokio::test]
async fn test_confirmed_account_deletion_clears_everything() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-1",
            "token_type": "bearer"
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/auth/delete-account"))
        .and(header("Authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Account deleted successfully"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut session = session_against(&mock_server.uri(), &dir);
    session
        .login("casey@example.com", "hunter2")
        .await
        .expect("Login should succeed");

    session
        .delete_account()
        .await
        .expect("Deletion should succeed");

    assert_eq!(session.state(), SessionState::Unauthenticated);
    assert_eq!(stored_token(&dir), None);
}

#[tokio::test]
async fn test_delete_account_requires_a_session() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut session = session_against("http://127.0.0.1:9", &dir);

    let result = session.delete_account().await;

    assert!(matches!(result, Err(SessionError::NotAuthenticated)));
}

#[tokio::test]
async fn test_guards_flip_on_mid_session_sign_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-1",
            "token_type": "bearer"
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/logout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Successfully logged out"
        })))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut session = session_against(&mock_server.uri(), &dir);
    session
        .login("casey@example.com", "hunter2")
        .await
        .expect("Login should succeed");

    let mut rx = session.subscribe();
    assert_eq!(
        AuthGuard::evaluate(&rx.borrow_and_update()),
        GuardOutcome::Mount
    );

    session.logout().await;

    rx.changed().await.expect("Sender should still be alive");
    assert_eq!(
        AuthGuard::evaluate(&rx.borrow_and_update()),
        GuardOutcome::Redirect(EntryPoint::Welcome)
    );
}

#[tokio::test]
async fn test_loading_is_observable_while_login_is_in_flight() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "access_token": "tok-1",
                    "token_type": "bearer"
                }))
                .set_delay(std::time::Duration::from_millis(200)),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut session = session_against(&mock_server.uri(), &dir);

    let mut rx = session.subscribe();
    let observer = tokio::spawn(async move {
        let mut seen = Vec::new();
        while rx.changed().await.is_ok() {
            let state = rx.borrow_and_update().clone();
            let settled = !state.is_loading();
            seen.push(state);
            if settled {
                break;
            }
        }
        seen
    });

    session
        .login("casey@example.com", "hunter2")
        .await
        .expect("Login should succeed");

    let seen = observer.await.expect("Observer task should finish");
    assert!(seen.contains(&SessionState::Loading));
    assert!(matches!(
        seen.last(),
        Some(SessionState::Authenticated { .. })
    ));
}

#[tokio::test]
async fn test_rejected_data_call_invalidates_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-1",
            "token_type": "bearer"
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .mount(&mock_server)
        .await;

    // The credential was revoked server-side after sign-in
    Mock::given(method("GET"))
        .and(path("/api/v1/chat/sessions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Could not validate credentials"
        })))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut session = session_against(&mock_server.uri(), &dir);
    session
        .login("casey@example.com", "hunter2")
        .await
        .expect("Login should succeed");

    let api = session.api().expect("Authenticated session exposes a client");
    let result = api.chat_sessions(0, 20).await;
    assert!(matches!(result, Err(ApiError::Unauthorized)));

    session.invalidate();

    assert_eq!(session.state(), SessionState::Unauthenticated);
    assert_eq!(stored_token(&dir), None);
    assert_eq!(
        AuthGuard::evaluate(&session.state()),
        GuardOutcome::Redirect(EntryPoint::Welcome)
    );
}
