//! HTTP invitation dispatcher.
//!
//! Posts `{ leadId, leadData, customMessage? }` as JSON to the configured notifier endpoint and
//! expects `{ invitationToken }` back. Failures are classified from the notifier's error text.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{DispatchError, DispatcherConfig, InvitationRequest, InvitationToken};
use crate::domain::ports::InvitationDispatcher;

pub struct HttpInvitationDispatcher {
    endpoint: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl HttpInvitationDispatcher {
    pub fn new(config: &DispatcherConfig) -> DomainResult<Self> {
        let endpoint = config
            .endpoint_url()
            .ok_or(DomainError::Dispatch(DispatchError::NotifierUnconfigured))?
            .to_string();

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DomainError::ValidationFailed(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            endpoint,
            api_key: config.api_key.clone(),
            client,
        })
    }
}

#[async_trait]
impl InvitationDispatcher for HttpInvitationDispatcher {
    async fn dispatch(&self, request: &InvitationRequest) -> Result<InvitationToken, DispatchError> {
        let mut builder = self.client.post(&self.endpoint).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| DispatchError::Failed(format!("Invitation request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DispatchError::Failed(format!("Failed to read notifier response: {e}")))?;

        if !status.is_success() {
            let message = error_message(&body);
            debug!(status = status.as_u16(), %message, "Notifier rejected invitation");
            return Err(DispatchError::classify(Some(status.as_u16()), &message));
        }

        let parsed: InvitationResponse = serde_json::from_str(&body)
            .map_err(|e| DispatchError::Failed(format!("Invalid notifier response: {e}")))?;

        match parsed.invitation_token {
            Some(token) if !token.is_empty() => Ok(InvitationToken::new(token)),
            _ => match parsed.error {
                Some(message) => Err(DispatchError::classify(Some(status.as_u16()), &message)),
                None => Err(DispatchError::Failed(
                    "Notifier response did not include an invitation token".to_string(),
                )),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InvitationResponse {
    invitation_token: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// Pull the human-readable error out of a notifier failure body.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            error: Some(message),
            ..
        })
        | Ok(ErrorBody {
            error: None,
            message: Some(message),
        }) => message,
        _ => body.trim().to_string(),
    }
}
