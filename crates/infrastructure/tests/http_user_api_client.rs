//! Outbound HTTP behaviour of the user API client against a mock admin API.

use std::sync::Arc;

use httpmock::prelude::*;
use opsdesk_application::{
    AccessTokenStore, Notification, Notifier, SubmitOutcome, UPDATE_FAILURE_MESSAGE,
    UPDATE_SUCCESS_MESSAGE, UserDetailView, UserQueryService, UserUpdateService,
};
use opsdesk_core::{AccessToken, AppError};
use opsdesk_domain::{FormField, UserId, UserRole, UserUpdatePayload};
use opsdesk_infrastructure::{FileAccessTokenStore, HttpUserApiClient};
use serde_json::json;
use url::Url;

fn client_for(server: &MockServer) -> HttpUserApiClient {
    let base_url = Url::parse(&server.base_url()).unwrap_or_else(|_| panic!("test"));
    HttpUserApiClient::new(reqwest::Client::new(), base_url)
}

fn user_id(value: u64) -> UserId {
    UserId::new(value).unwrap_or_else(|_| panic!("test"))
}

fn token() -> AccessToken {
    AccessToken::new("token-1").unwrap_or_else(|_| panic!("test"))
}

fn ada_payload() -> UserUpdatePayload {
    UserUpdatePayload {
        name: "Ada".to_owned(),
        email: "ada@x.com".to_owned(),
        role: UserRole::new("admin"),
    }
}

#[tokio::test]
async fn fetch_user_reads_detail_endpoint() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/users/7/");
        then.status(200).json_body(json!({
            "id": 7,
            "name": "Ada",
            "email": "a@x.com",
            "role": { "name": "admin" },
            "created_at": "2024-01-01"
        }));
    });

    let record = client_for(&server).fetch_user(user_id(7)).await;

    mock.assert();
    let record = record.unwrap_or_else(|_| panic!("test"));
    assert_eq!(record.id, Some(user_id(7)));
    assert_eq!(record.name, "Ada");
    assert_eq!(record.role.name, "admin");
    assert_eq!(record.created_at, "2024-01-01");
}

#[tokio::test]
async fn fetch_user_maps_missing_user_to_not_found() {
    let server = MockServer::start();
    let _mock = server.mock(|when, then| {
        when.method(GET).path("/users/9/");
        then.status(404).body("not found");
    });

    let result = client_for(&server).fetch_user(user_id(9)).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn update_user_puts_json_with_bearer_token() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(PUT)
            .path("/users/7/")
            .header("content-type", "application/json")
            .header("authorization", "Bearer token-1")
            .json_body(json!({
                "name": "Ada",
                "email": "ada@x.com",
                "role": { "name": "admin" }
            }));
        then.status(200).json_body(json!({ "ok": true }));
    });

    let status = client_for(&server)
        .update_user(user_id(7), &ada_payload(), &token())
        .await;

    mock.assert();
    assert_eq!(status.ok().map(|status| status.code()), Some(200));
}

#[tokio::test]
async fn update_user_server_error_is_an_error() {
    let server = MockServer::start();
    let _mock = server.mock(|when, then| {
        when.method(PUT).path("/users/7/");
        then.status(500).body("boom");
    });

    let result = client_for(&server)
        .update_user(user_id(7), &ada_payload(), &token())
        .await;
    assert!(matches!(result, Err(AppError::Transport(_))));
}

#[tokio::test]
async fn update_user_network_failure_is_a_transport_error() {
    let base_url = Url::parse("http://127.0.0.1:9").unwrap_or_else(|_| panic!("test"));
    let client = HttpUserApiClient::new(reqwest::Client::new(), base_url);

    let result = client
        .update_user(user_id(7), &ada_payload(), &token())
        .await;
    assert!(matches!(result, Err(AppError::Transport(_))));
}

#[derive(Default)]
struct CollectingNotifier {
    shown: std::sync::Mutex<Vec<Notification>>,
}

impl Notifier for CollectingNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut shown) = self.shown.lock() {
            shown.push(notification);
        }
    }
}

impl CollectingNotifier {
    fn shown(&self) -> Vec<Notification> {
        self.shown
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

fn view_for(
    server: &MockServer,
    directory: &tempfile::TempDir,
) -> (UserDetailView, Arc<CollectingNotifier>) {
    let path = directory.path().join("local_storage.json");
    std::fs::write(&path, r#"{"access": "token-1"}"#).unwrap_or_else(|_| panic!("test"));

    let client = Arc::new(client_for(server));
    let tokens: Arc<dyn AccessTokenStore> = Arc::new(FileAccessTokenStore::new(path));
    let notifier = Arc::new(CollectingNotifier::default());
    let view = UserDetailView::new(client.clone(), client, tokens, notifier.clone());
    (view, notifier)
}

#[tokio::test]
async fn edited_email_round_trips_through_the_api() {
    let server = MockServer::start();
    let read = server.mock(|when, then| {
        when.method(GET).path("/users/7/");
        then.status(200).json_body(json!({
            "name": "Ada",
            "email": "a@x.com",
            "role": { "name": "admin" },
            "created_at": "2024-01-01"
        }));
    });
    let write = server.mock(|when, then| {
        when.method(PUT)
            .path("/users/7/")
            .header("authorization", "Bearer token-1")
            .json_body(json!({
                "name": "Ada",
                "email": "ada@x.com",
                "role": { "name": "admin" }
            }));
        then.status(200);
    });

    let directory = tempfile::tempdir().unwrap_or_else(|_| panic!("test"));
    let (view, notifier) = view_for(&server, &directory);

    assert!(view.activate("7").await.is_ok());
    assert!(view.edit(FormField::Email, "ada@x.com").is_ok());
    let outcome = view.submit().await;

    assert!(matches!(outcome, Ok(SubmitOutcome::Updated { .. })));
    write.assert();
    assert_eq!(read.calls(), 2);
    assert_eq!(
        notifier.shown(),
        vec![Notification::success(UPDATE_SUCCESS_MESSAGE)]
    );
}

#[tokio::test]
async fn rejected_update_keeps_the_edited_email() {
    let server = MockServer::start();
    let read = server.mock(|when, then| {
        when.method(GET).path("/users/7/");
        then.status(200).json_body(json!({
            "name": "Ada",
            "email": "a@x.com",
            "role": { "name": "admin" },
            "created_at": "2024-01-01"
        }));
    });
    let _write = server.mock(|when, then| {
        when.method(PUT).path("/users/7/");
        then.status(500);
    });

    let directory = tempfile::tempdir().unwrap_or_else(|_| panic!("test"));
    let (view, notifier) = view_for(&server, &directory);

    assert!(view.activate("7").await.is_ok());
    assert!(view.edit(FormField::Email, "ada@x.com").is_ok());
    let outcome = view.submit().await;

    assert_eq!(outcome.ok(), Some(SubmitOutcome::Failed));
    assert_eq!(read.calls(), 1);
    assert_eq!(
        notifier.shown(),
        vec![Notification::error(UPDATE_FAILURE_MESSAGE)]
    );
    let email = view.snapshot().ok().and_then(|snapshot| {
        snapshot
            .field(FormField::Email)
            .and_then(|field| field.value().map(str::to_owned))
    });
    assert_eq!(email.as_deref(), Some("ada@x.com"));
}
