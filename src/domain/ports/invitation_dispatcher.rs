//! Invitation dispatcher port.

use async_trait::async_trait;

use crate::domain::models::{DispatchError, InvitationRequest, InvitationToken};

/// Outbound notifier that invites a lead to create an account.
#[async_trait]
pub trait InvitationDispatcher: Send + Sync {
    /// Send the invitation and return the token the notifier issued.
    async fn dispatch(&self, request: &InvitationRequest) -> Result<InvitationToken, DispatchError>;
}
