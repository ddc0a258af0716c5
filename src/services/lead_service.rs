//! Lead service: read access and the external contact transition.

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{ClientProfile, FollowUpTask, Lead, LeadStatus};
use crate::domain::ports::{ClientProfileRepository, LeadFilter, LeadRepository};

pub struct LeadService {
    leads: Arc<dyn LeadRepository>,
    clients: Arc<dyn ClientProfileRepository>,
}

impl LeadService {
    pub fn new(leads: Arc<dyn LeadRepository>, clients: Arc<dyn ClientProfileRepository>) -> Self {
        Self { leads, clients }
    }

    /// Get a lead by ID.
    pub async fn get_lead(&self, id: Uuid) -> DomainResult<Option<Lead>> {
        self.leads.get(id).await
    }

    /// Get a lead by ID, failing when it does not exist.
    pub async fn require_lead(&self, id: Uuid) -> DomainResult<Lead> {
        self.leads.get(id).await?.ok_or(DomainError::LeadNotFound(id))
    }

    /// List leads with optional filters, newest first.
    pub async fn list_leads(&self, filter: LeadFilter) -> DomainResult<Vec<Lead>> {
        self.leads.list(filter).await
    }

    /// Follow-up tasks for a lead, earliest due first.
    pub async fn follow_ups(&self, lead_id: Uuid) -> DomainResult<Vec<FollowUpTask>> {
        self.leads.get_follow_ups(lead_id).await
    }

    /// Record that a professional has reached out to a new lead.
    ///
    /// The status check runs here first; the repository repeats it atomically so a
    /// concurrent conversion cannot be overwritten.
    pub async fn mark_contacted(&self, id: Uuid) -> DomainResult<Lead> {
        let lead = self.require_lead(id).await?;
        if !lead.status.can_transition_to(LeadStatus::Contacted) {
            return Err(DomainError::InvalidStateTransition {
                from: lead.status.as_str().to_string(),
                to: LeadStatus::Contacted.as_str().to_string(),
                reason: "only new leads can be marked contacted".to_string(),
            });
        }

        self.leads.mark_contacted(id).await?;
        info!(lead_id = %id, "Lead marked contacted");
        self.require_lead(id).await
    }

    /// Client profile created from a lead, if it has been converted.
    pub async fn client_for_lead(&self, lead_id: Uuid) -> DomainResult<Option<ClientProfile>> {
        self.clients.get_by_lead(lead_id).await
    }

    /// Client profiles owned by a professional.
    pub async fn clients_for_professional(
        &self,
        professional_id: Uuid,
    ) -> DomainResult<Vec<ClientProfile>> {
        self.clients.list_by_professional(professional_id).await
    }
}
