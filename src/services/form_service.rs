//! Form service: create lead-capture forms and toggle whether they accept submissions.

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::LeadForm;
use crate::domain::ports::{LeadFormFilter, LeadFormRepository};

pub struct FormService {
    repository: Arc<dyn LeadFormRepository>,
}

impl FormService {
    pub fn new(repository: Arc<dyn LeadFormRepository>) -> Self {
        Self { repository }
    }

    /// Create a new, active form.
    pub async fn create_form(&self, professional_id: Uuid, name: String) -> DomainResult<LeadForm> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::ValidationFailed(
                "Form name cannot be empty".to_string(),
            ));
        }

        let form = LeadForm::new(professional_id, name);
        self.repository.create(&form).await?;

        info!(form_id = %form.id, professional_id = %professional_id, "Lead form created");
        Ok(form)
    }

    pub async fn get_form(&self, id: Uuid) -> DomainResult<Option<LeadForm>> {
        self.repository.get(id).await
    }

    pub async fn list_forms(&self, filter: LeadFormFilter) -> DomainResult<Vec<LeadForm>> {
        self.repository.list(filter).await
    }

    /// Start accepting submissions.
    pub async fn activate(&self, id: Uuid) -> DomainResult<LeadForm> {
        self.set_active(id, true).await
    }

    /// Stop accepting submissions. Existing leads are untouched.
    pub async fn deactivate(&self, id: Uuid) -> DomainResult<LeadForm> {
        self.set_active(id, false).await
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> DomainResult<LeadForm> {
        self.repository.set_active(id, is_active).await?;
        info!(form_id = %id, is_active, "Lead form activation changed");
        self.repository
            .get(id)
            .await?
            .ok_or(DomainError::FormNotFound(id))
    }
}
