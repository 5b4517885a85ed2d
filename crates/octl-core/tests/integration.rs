//! End-to-end tests for the sign-in lifecycle and Graph calls.
//!
//! One mock server plays both the identity platform and Microsoft Graph.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use octl_core::mail::{self, ListOptions};
use octl_core::{AuthManager, Config, ConfigStore, CredentialStoreKind, GraphClient};
use octl_oauth::Provider;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn id_token() -> String {
    let claims = serde_json::json!({
        "preferred_username": "ada@example.com",
        "oid": "0001",
        "tid": "9188"
    });
    format!("e30.{}.sig", URL_SAFE_NO_PAD.encode(claims.to_string()))
}

async fn mock_identity(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/devicecode"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "device_code": "dev",
            "user_code": "WXYZ",
            "verification_uri": "https://microsoft.com/devicelogin",
            "expires_in": 900,
            "interval": 0
        })))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "graph-token",
            "token_type": "Bearer",
            "expires_in": 3600,
            "refresh_token": "rt",
            "id_token": id_token()
        })))
        .mount(server)
        .await;
}

fn provider(server: &MockServer) -> Provider {
    Provider::new(
        "Test",
        format!("{}/authorize", server.uri()),
        format!("{}/token", server.uri()),
    )
    .unwrap()
    .with_device_auth_url(format!("{}/devicecode", server.uri()))
    .unwrap()
}

fn manager(store: &ConfigStore, server: &MockServer) -> AuthManager {
    let config = store.load().unwrap();
    AuthManager::from_config(store.clone(), &config, config.client_id.clone())
        .with_provider(provider(server))
}

#[tokio::test]
async fn test_login_then_list_messages_then_logout() {
    let server = MockServer::start().await;
    mock_identity(&server).await;
    Mock::given(method("GET"))
        .and(path("/me/mailFolders/inbox/messages"))
        .and(header("authorization", "Bearer graph-token"))
        .and(query_param("$filter", "isRead eq false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "value": [{
                "id": "AAMk1",
                "subject": "Welcome",
                "from": {"emailAddress": {"name": "Bob", "address": "bob@example.com"}},
                "receivedDateTime": "2024-01-15T10:30:00Z",
                "isRead": false
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = ConfigStore::new(dir.path());
    store
        .save(&Config {
            credential_store: CredentialStoreKind::File,
            ..Config::default()
        })
        .unwrap();
    store.set_client_id("cid").unwrap();

    let auth = manager(&store, &server);
    let record = auth.login(Duration::from_secs(30), |_| {}).await.unwrap();
    assert_eq!(record.username, "ada@example.com");
    assert!(store.auth_record_path().exists());

    // A fresh manager picks up the stored sign-in silently.
    let auth = manager(&store, &server);
    let status = auth.status().await;
    assert!(status.logged_in);
    assert_eq!(status.home_account_id.as_deref(), Some("0001.9188"));

    let client = GraphClient::new(auth.access_token().await.unwrap())
        .unwrap()
        .with_base_url(&server.uri())
        .unwrap();
    let opts = ListOptions {
        unread_only: true,
        folder_id: Some("inbox".to_string()),
        ..ListOptions::default()
    };
    let messages = mail::list_messages(&client, &opts).await.unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].from, "Bob <bob@example.com>");
    assert!(!messages[0].is_read);

    auth.logout().unwrap();
    assert!(!store.auth_record_path().exists());
    let status = manager(&store, &server).status().await;
    assert!(status.configured);
    assert!(!status.logged_in);
}

#[tokio::test]
async fn test_graph_error_surfaces_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me/messages/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error": {"code": "ErrorItemNotFound", "message": "The specified object was not found in the store."}
        })))
        .mount(&server)
        .await;

    let client = GraphClient::new("tok")
        .unwrap()
        .with_base_url(&server.uri())
        .unwrap();
    let err = mail::get_message(&client, "missing").await.unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("ErrorItemNotFound"));
}
