// tests/integration/auth.rs - Credential acquisition against the mock API

use dummyjson_suite::auth::{current_user, refresh_tokens};
use dummyjson_suite::{get_access_token, ApiContext, CredentialAcquirer, LoginOptions, SuiteError};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

use super::TestHarness;
use crate::helpers::assertions::assert_contexts_balanced;
use crate::helpers::CountingObserver;

#[tokio::test]
async fn test_default_login_returns_token_pair() {
    let harness = TestHarness::new().await;

    let tokens = harness
        .acquirer()
        .acquire(&LoginOptions::default())
        .await
        .expect("login should succeed");

    assert!(tokens.access_token.starts_with("access-"));
    assert!(tokens.refresh_token.starts_with("refresh-"));

    // expiresInMins is left out entirely when not requested
    let bodies = harness.server.login_bodies().await;
    assert_eq!(bodies, vec![json!({"username": "emilys", "password": "emilyspass"})]);
    assert_eq!(
        harness.server.content_types("/auth/login").await,
        vec![Some("application/json".to_string())]
    );
    assert_contexts_balanced(&harness.observer, 1);
}

#[tokio::test]
async fn test_expires_in_mins_is_forwarded() {
    let harness = TestHarness::new().await;

    harness
        .acquirer()
        .acquire(&LoginOptions::default().with_expires_in_mins(30))
        .await
        .expect("login should succeed");

    let bodies = harness.server.login_bodies().await;
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["expiresInMins"], json!(30));
    assert_contexts_balanced(&harness.observer, 1);
}

#[tokio::test]
async fn test_other_account_from_options() {
    let harness = TestHarness::new().await;

    let options = LoginOptions::default()
        .with_username("michaelw")
        .with_password("michaelwpass");
    let tokens = get_access_token(&harness.config, &options).await.unwrap();
    assert!(!tokens.access_token.is_empty());

    let bodies = harness.server.login_bodies().await;
    assert_eq!(bodies[0]["username"], json!("michaelw"));
}

#[tokio::test]
async fn test_invalid_credentials_fail_with_status_and_body() {
    let harness = TestHarness::new().await;

    let err = harness
        .acquirer()
        .acquire(&LoginOptions::default().with_password("wrong"))
        .await
        .unwrap_err();

    match &err {
        SuiteError::AuthenticationFailure { status, body } => {
            assert_eq!(*status, 400);
            assert!(body.contains("Invalid credentials"), "body was {}", body);
        }
        other => panic!("expected AuthenticationFailure, got {:?}", other),
    }
    assert!(err.is_authentication_failure());
    assert_eq!(err.status(), Some(400));
    assert_contexts_balanced(&harness.observer, 1);
}

#[tokio::test]
async fn test_server_error_keeps_status_and_text() {
    let harness = TestHarness::new().await;
    harness.server.set_login_response(500, "upstream exploded").await;

    let err = harness
        .acquirer()
        .acquire(&LoginOptions::default())
        .await
        .unwrap_err();

    assert!(err.is_authentication_failure());
    assert_eq!(err.status(), Some(500));
    assert!(err.to_string().contains("upstream exploded"));
    assert_contexts_balanced(&harness.observer, 1);
}

#[tokio::test]
async fn test_missing_access_token_is_protocol_violation() {
    let harness = TestHarness::new().await;
    harness
        .server
        .set_login_response(200, r#"{"refreshToken": "r-1", "id": 1}"#)
        .await;

    let err = harness
        .acquirer()
        .acquire(&LoginOptions::default())
        .await
        .unwrap_err();

    assert!(err.is_protocol_violation(), "got {:?}", err);
    assert!(err.to_string().contains("accessToken"));
    assert_contexts_balanced(&harness.observer, 1);
}

#[tokio::test]
async fn test_empty_access_token_is_protocol_violation() {
    let harness = TestHarness::new().await;
    harness
        .server
        .set_login_response(200, r#"{"accessToken": "", "refreshToken": "r-1"}"#)
        .await;

    let err = harness
        .acquirer()
        .acquire(&LoginOptions::default())
        .await
        .unwrap_err();
    assert!(err.is_protocol_violation(), "got {:?}", err);
}

#[tokio::test]
async fn test_non_json_success_is_protocol_violation() {
    let harness = TestHarness::new().await;
    harness.server.set_login_response(200, "<html>maintenance</html>").await;

    let err = harness
        .acquirer()
        .acquire(&LoginOptions::default())
        .await
        .unwrap_err();

    assert!(err.is_protocol_violation(), "got {:?}", err);
    assert_contexts_balanced(&harness.observer, 1);
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error() {
    // Reserve a port, then free it so nothing is listening there
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let observer = Arc::new(CountingObserver::default());

    let err = CredentialAcquirer::new(format!("http://127.0.0.1:{}", port))
        .with_observer(observer.clone())
        .acquire(&LoginOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, SuiteError::Transport(_)), "got {:?}", err);
    assert_eq!(err.status(), None);
    assert_contexts_balanced(&observer, 1);
}

#[tokio::test]
async fn test_repeated_acquisitions_are_independent() {
    let harness = TestHarness::new().await;
    let acquirer = harness.acquirer();

    let first = acquirer.acquire(&LoginOptions::default()).await.unwrap();
    let second = acquirer.acquire(&LoginOptions::default()).await.unwrap();

    assert_ne!(first.access_token, second.access_token);
    assert_eq!(harness.server.login_count().await, 2);
    assert_contexts_balanced(&harness.observer, 2);
}

#[tokio::test]
async fn test_refresh_and_current_user_with_bearer_context() {
    let harness = TestHarness::new().await;
    let tokens = harness.acquirer().acquire(&LoginOptions::default()).await.unwrap();

    let api = ApiContext::from_config(&harness.config)
        .bearer(&tokens.access_token)
        .build()
        .unwrap();

    let me = current_user(&api).await.unwrap();
    assert_eq!(me.id, 1);
    assert_eq!(me.username, "emilys");

    let fresh = refresh_tokens(&api, &tokens.refresh_token).await.unwrap();
    assert_ne!(fresh.access_token, tokens.access_token);

    let err = refresh_tokens(&api, "refresh-bogus").await.unwrap_err();
    assert_eq!(err.status(), Some(403));
    api.dispose();
}

#[tokio::test]
async fn test_current_user_without_token_is_unauthorized() {
    let harness = TestHarness::new().await;
    let api = ApiContext::from_config(&harness.config).build().unwrap();

    let err = current_user(&api).await.unwrap_err();
    assert_eq!(err.status(), Some(401));
}
