//! Activity repository port.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::LeadActivity;

/// Append-only store for lead activities.
///
/// There is deliberately no update or delete.
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    /// Append an activity.
    async fn append(&self, activity: &LeadActivity) -> DomainResult<()>;

    /// Activities recorded against a lead, newest first.
    async fn list_for_lead(&self, lead_id: Uuid) -> DomainResult<Vec<LeadActivity>>;
}
