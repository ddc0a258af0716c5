//! HTTP invitation dispatcher against a mock notifier.

use leadflow::adapters::dispatcher::HttpInvitationDispatcher;
use leadflow::domain::models::{DispatchError, DispatcherConfig, InvitationRequest, LeadData};
use leadflow::domain::ports::InvitationDispatcher;
use mockito::{Matcher, Server};
use serde_json::json;
use uuid::Uuid;

fn config(endpoint: String, api_key: Option<&str>) -> DispatcherConfig {
    DispatcherConfig {
        endpoint: Some(endpoint),
        api_key: api_key.map(str::to_string),
        timeout_secs: 5,
    }
}

fn request() -> InvitationRequest {
    InvitationRequest {
        lead_id: Uuid::new_v4(),
        lead_data: LeadData::default()
            .with_field("email", "dana@example.com")
            .with_field("name", "Dana"),
        custom_message: Some("See you soon".to_string()),
    }
}

#[tokio::test]
async fn test_dispatch_returns_token() {
    let mut server = Server::new_async().await;
    let invitation = request();
    let mock = server
        .mock("POST", "/invite")
        .match_header("authorization", "Bearer secret")
        .match_body(Matcher::PartialJson(json!({
            "leadId": invitation.lead_id,
            "leadData": { "email": "dana@example.com" },
            "customMessage": "See you soon"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "invitationToken": "inv-42" }).to_string())
        .create_async()
        .await;

    let dispatcher =
        HttpInvitationDispatcher::new(&config(format!("{}/invite", server.url()), Some("secret")))
            .unwrap();
    let token = dispatcher.dispatch(&invitation).await.unwrap();

    assert_eq!(token.as_str(), "inv-42");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unconfigured_provider_message_is_classified() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/invite")
        .with_status(500)
        .with_body(json!({ "error": "RESEND_API_KEY is not configured" }).to_string())
        .create_async()
        .await;

    let dispatcher =
        HttpInvitationDispatcher::new(&config(format!("{}/invite", server.url()), None)).unwrap();
    let err = dispatcher.dispatch(&request()).await.unwrap_err();

    assert_eq!(err, DispatchError::NotifierUnconfigured);
}

#[tokio::test]
async fn test_forbidden_status_is_unauthorized() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/invite")
        .with_status(403)
        .with_body("nope")
        .create_async()
        .await;

    let dispatcher =
        HttpInvitationDispatcher::new(&config(format!("{}/invite", server.url()), None)).unwrap();
    let err = dispatcher.dispatch(&request()).await.unwrap_err();

    assert_eq!(err, DispatchError::Unauthorized);
}

#[tokio::test]
async fn test_error_in_success_body_is_classified() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/invite")
        .with_status(200)
        .with_body(json!({ "error": "Lead has no email address" }).to_string())
        .create_async()
        .await;

    let dispatcher =
        HttpInvitationDispatcher::new(&config(format!("{}/invite", server.url()), None)).unwrap();
    let err = dispatcher.dispatch(&request()).await.unwrap_err();

    assert_eq!(err, DispatchError::MissingRecipient);
}

#[tokio::test]
async fn test_garbage_response_is_generic_failure() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/invite")
        .with_status(502)
        .with_body("<html>Bad gateway</html>")
        .create_async()
        .await;

    let dispatcher =
        HttpInvitationDispatcher::new(&config(format!("{}/invite", server.url()), None)).unwrap();
    let err = dispatcher.dispatch(&request()).await.unwrap_err();

    assert!(matches!(err, DispatchError::Failed(_)));
    assert_eq!(err.user_message(), "Failed to send invitation. Please try again.");
}
