//! Lead repository port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::{ClientProfile, FollowUpTask, Lead, LeadScore, LeadStatus};

/// Filter criteria for listing leads.
#[derive(Debug, Clone, Default)]
pub struct LeadFilter {
    pub form_id: Option<Uuid>,
    pub professional_id: Option<Uuid>,
    pub status: Option<LeadStatus>,
    pub score: Option<LeadScore>,
    pub limit: Option<i64>,
}

/// Repository interface for leads and their follow-up tasks.
#[async_trait]
pub trait LeadRepository: Send + Sync {
    /// Insert a lead and its follow-up task in one transaction.
    ///
    /// Either both rows exist afterwards or neither does.
    async fn create_with_follow_up(&self, lead: &Lead, task: &FollowUpTask) -> DomainResult<()>;

    /// Insert a lead on its own.
    async fn create(&self, lead: &Lead) -> DomainResult<()>;

    /// Insert a follow-up task for an existing lead.
    async fn create_follow_up(&self, task: &FollowUpTask) -> DomainResult<()>;

    /// Get a lead by ID.
    async fn get(&self, id: Uuid) -> DomainResult<Option<Lead>>;

    /// List leads with optional filters, newest first.
    async fn list(&self, filter: LeadFilter) -> DomainResult<Vec<Lead>>;

    /// Follow-up tasks attached to a lead, earliest due first.
    async fn get_follow_ups(&self, lead_id: Uuid) -> DomainResult<Vec<FollowUpTask>>;

    /// Move a lead from `new` to `contacted`.
    ///
    /// Fails with `InvalidStateTransition` when the lead is in any other status.
    async fn mark_contacted(&self, id: Uuid) -> DomainResult<()>;

    /// Insert the client profile and mark its lead converted in one transaction.
    ///
    /// The lead update only applies while the lead is `new` or `contacted`; otherwise the
    /// transaction is rolled back and `LeadAlreadyConverted` is returned.
    async fn convert_to_client(
        &self,
        profile: &ClientProfile,
        user_id: Uuid,
        conversion_date: DateTime<Utc>,
    ) -> DomainResult<()>;
}
