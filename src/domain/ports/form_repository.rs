//! Lead form repository port.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::LeadForm;

/// Filter criteria for listing forms.
#[derive(Debug, Clone, Default)]
pub struct LeadFormFilter {
    pub professional_id: Option<Uuid>,
    pub active_only: bool,
}

/// Repository interface for LeadForm persistence.
#[async_trait]
pub trait LeadFormRepository: Send + Sync {
    /// Create a new form.
    async fn create(&self, form: &LeadForm) -> DomainResult<()>;

    /// Get a form by ID.
    async fn get(&self, id: Uuid) -> DomainResult<Option<LeadForm>>;

    /// List forms with optional filters.
    async fn list(&self, filter: LeadFormFilter) -> DomainResult<Vec<LeadForm>>;

    /// Toggle whether the form accepts submissions.
    async fn set_active(&self, id: Uuid, is_active: bool) -> DomainResult<()>;
}
