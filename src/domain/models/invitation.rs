//! Invitation types shared between the conversion workflow and dispatcher adapters.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use super::lead::LeadData;

/// Outbound request asking the notifier to invite a lead to sign up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationRequest {
    pub lead_id: Uuid,
    pub lead_data: LeadData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_message: Option<String>,
}

/// Opaque token identifying an issued invitation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvitationToken(String);

impl InvitationToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvitationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Failure categories reported by the invitation dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("invitation notifier is not configured")]
    NotifierUnconfigured,

    #[error("lead has no email address")]
    MissingRecipient,

    #[error("caller is not authorized to send invitations")]
    Unauthorized,

    #[error("invitation dispatch failed: {0}")]
    Failed(String),
}

impl DispatchError {
    /// Map a notifier failure onto a category.
    ///
    /// Notifiers report most failures as free text, so the message is matched before falling
    /// back to the HTTP status.
    pub fn classify(status: Option<u16>, message: &str) -> Self {
        let lower = message.to_lowercase();

        if lower.contains("not configured")
            || lower.contains("api key")
            || lower.contains("api_key")
        {
            return Self::NotifierUnconfigured;
        }

        if lower.contains("no email")
            || lower.contains("missing email")
            || lower.contains("email is required")
            || lower.contains("email address is required")
        {
            return Self::MissingRecipient;
        }

        if lower.contains("unauthorized")
            || lower.contains("not authorized")
            || lower.contains("forbidden")
            || matches!(status, Some(401 | 403))
        {
            return Self::Unauthorized;
        }

        Self::Failed(message.to_string())
    }

    /// Message safe to show to the person who triggered the invitation.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NotifierUnconfigured => {
                "Invitation service is not configured. Please contact support."
            }
            Self::MissingRecipient => "This lead has no email address to send an invitation to.",
            Self::Unauthorized => "You are not authorized to send invitations for this lead.",
            Self::Failed(_) => "Failed to send invitation. Please try again.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_unconfigured() {
        assert_eq!(
            DispatchError::classify(Some(500), "RESEND_API_KEY is not configured"),
            DispatchError::NotifierUnconfigured
        );
        assert_eq!(
            DispatchError::classify(None, "Missing API key for email provider"),
            DispatchError::NotifierUnconfigured
        );
    }

    #[test]
    fn test_classify_missing_recipient() {
        assert_eq!(
            DispatchError::classify(Some(400), "Lead has no email"),
            DispatchError::MissingRecipient
        );
        assert_eq!(
            DispatchError::classify(Some(400), "Email address is required"),
            DispatchError::MissingRecipient
        );
    }

    #[test]
    fn test_classify_unauthorized() {
        assert_eq!(
            DispatchError::classify(Some(401), "denied"),
            DispatchError::Unauthorized
        );
        assert_eq!(
            DispatchError::classify(Some(500), "Unauthorized professional"),
            DispatchError::Unauthorized
        );
    }

    #[test]
    fn test_classify_generic() {
        let err = DispatchError::classify(Some(502), "upstream timeout");
        assert_eq!(err, DispatchError::Failed("upstream timeout".to_string()));
        assert_eq!(err.user_message(), "Failed to send invitation. Please try again.");
    }

    #[test]
    fn test_user_messages_are_distinct() {
        let messages = [
            DispatchError::NotifierUnconfigured.user_message(),
            DispatchError::MissingRecipient.user_message(),
            DispatchError::Unauthorized.user_message(),
            DispatchError::Failed(String::new()).user_message(),
        ];
        for (i, a) in messages.iter().enumerate() {
            for b in &messages[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_request_uses_camel_case() {
        let request = InvitationRequest {
            lead_id: Uuid::nil(),
            lead_data: LeadData::default().with_field("email", "a@b.com"),
            custom_message: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("leadId").is_some());
        assert!(value.get("leadData").is_some());
        assert!(value.get("customMessage").is_none());
    }
}
