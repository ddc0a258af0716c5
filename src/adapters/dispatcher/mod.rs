//! Invitation dispatcher adapters.

pub mod http;

pub use http::HttpInvitationDispatcher;

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::errors::DomainResult;
use crate::domain::models::{DispatchError, DispatcherConfig, InvitationRequest, InvitationToken};
use crate::domain::ports::InvitationDispatcher;

/// Dispatcher used when no notifier endpoint is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredDispatcher;

#[async_trait]
impl InvitationDispatcher for UnconfiguredDispatcher {
    async fn dispatch(&self, _request: &InvitationRequest) -> Result<InvitationToken, DispatchError> {
        Err(DispatchError::NotifierUnconfigured)
    }
}

/// Build the dispatcher described by the configuration.
pub fn dispatcher_from_config(config: &DispatcherConfig) -> DomainResult<Arc<dyn InvitationDispatcher>> {
    if config.endpoint_url().is_some() {
        Ok(Arc::new(HttpInvitationDispatcher::new(config)?))
    } else {
        tracing::warn!("No invitation endpoint configured, invitations will be rejected");
        Ok(Arc::new(UnconfiguredDispatcher))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::LeadData;
    use uuid::Uuid;

    fn request() -> InvitationRequest {
        InvitationRequest {
            lead_id: Uuid::new_v4(),
            lead_data: LeadData::default().with_field("email", "a@b.com"),
            custom_message: None,
        }
    }

    #[tokio::test]
    async fn test_missing_endpoint_yields_unconfigured() {
        let dispatcher = dispatcher_from_config(&DispatcherConfig::default()).unwrap();
        assert_eq!(
            dispatcher.dispatch(&request()).await,
            Err(DispatchError::NotifierUnconfigured)
        );
    }

    #[tokio::test]
    async fn test_blank_endpoint_yields_unconfigured() {
        let config = DispatcherConfig {
            endpoint: Some("  ".to_string()),
            ..DispatcherConfig::default()
        };
        let dispatcher = dispatcher_from_config(&config).unwrap();
        assert_eq!(
            dispatcher.dispatch(&request()).await,
            Err(DispatchError::NotifierUnconfigured)
        );
    }
}
