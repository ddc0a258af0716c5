//! Intake pipeline: validate → score → create-atomic → create-fallback.
//!
//! Each stage is a separate method so its failure mode can be exercised on its own.
//! Only form validation and the fallback lead insert can fail the request; a failed
//! transaction is absorbed by the fallback and a failed fallback task insert is
//! reported through [`FollowUpOutcome::Missing`].

use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{FollowUpTask, Lead, LeadData, LeadForm, LeadScore};
use crate::domain::ports::{LeadFormRepository, LeadRepository};
use crate::services::follow_up_policy::FollowUpPolicy;
use crate::services::scoring::LeadScorer;

/// A form submission entering the pipeline.
#[derive(Debug, Clone)]
pub struct LeadSubmission {
    pub form_id: Uuid,
    /// Owner claimed by the submitter; the form row is authoritative
    pub professional_id: Option<Uuid>,
    pub data: LeadData,
}

/// How the follow-up task for a new lead ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowUpOutcome {
    /// Lead and task were written in one transaction
    Atomic,
    /// Transaction failed; lead and task were written one after the other
    Fallback,
    /// Transaction failed and the fallback task insert failed too
    Missing,
}

/// Result of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntakeReceipt {
    pub lead_id: Uuid,
    pub score: LeadScore,
    pub follow_up: FollowUpOutcome,
    pub follow_up_task_id: Option<Uuid>,
}

/// Failures surfaced to the submitter.
#[derive(Debug, Error)]
pub enum IntakeError {
    /// Unknown or inactive form; nothing was written
    #[error("Form not found or inactive: {0}")]
    FormNotFound(Uuid),

    /// The fallback could not store the lead itself
    #[error("Failed to persist lead: {0}")]
    Persistence(#[source] DomainError),

    /// Anything else, e.g. the form lookup failing
    #[error("Unexpected intake failure: {0}")]
    Internal(#[source] DomainError),
}

pub struct IntakeService {
    forms: Arc<dyn LeadFormRepository>,
    leads: Arc<dyn LeadRepository>,
    scorer: LeadScorer,
}

impl IntakeService {
    pub fn new(forms: Arc<dyn LeadFormRepository>, leads: Arc<dyn LeadRepository>) -> Self {
        Self {
            forms,
            leads,
            scorer: LeadScorer::default(),
        }
    }

    /// Run a submission through the whole pipeline.
    #[instrument(skip(self, submission), fields(form_id = %submission.form_id))]
    pub async fn submit(&self, submission: LeadSubmission) -> Result<IntakeReceipt, IntakeError> {
        let form = self.validate(submission.form_id).await?;

        if let Some(claimed) = submission.professional_id {
            if claimed != form.professional_id {
                warn!(
                    claimed_professional_id = %claimed,
                    form_professional_id = %form.professional_id,
                    "Submission names a different professional than the form owner, using form owner"
                );
            }
        }

        let score = self.scorer.score(&submission.data);
        let lead = Lead::new(form.id, form.professional_id, submission.data, score);
        let task = FollowUpPolicy::build_task(&lead);

        debug!(lead_id = %lead.id, score = %score, "Scored submission");

        match self.create_atomic(&lead, &task).await {
            Ok(receipt) => Ok(receipt),
            Err(err) => {
                warn!(
                    lead_id = %lead.id,
                    error = %err,
                    "Atomic lead creation failed, falling back to sequential inserts"
                );
                self.create_fallback(&lead, &task).await
            }
        }
    }

    /// Stage 1: the target form must exist and be active.
    pub async fn validate(&self, form_id: Uuid) -> Result<LeadForm, IntakeError> {
        match self.forms.get(form_id).await {
            Ok(Some(form)) if form.is_active => Ok(form),
            Ok(Some(_)) => {
                info!(form_id = %form_id, "Rejected submission to inactive form");
                Err(IntakeError::FormNotFound(form_id))
            }
            Ok(None) => {
                info!(form_id = %form_id, "Rejected submission to unknown form");
                Err(IntakeError::FormNotFound(form_id))
            }
            Err(err) => {
                error!(form_id = %form_id, error = %err, "Failed to look up form");
                Err(IntakeError::Internal(err))
            }
        }
    }

    /// Stage 3: write lead and task in a single transaction.
    pub async fn create_atomic(&self, lead: &Lead, task: &FollowUpTask) -> DomainResult<IntakeReceipt> {
        self.leads.create_with_follow_up(lead, task).await?;

        info!(
            lead_id = %lead.id,
            score = %lead.score,
            priority = %task.priority,
            due_date = %task.due_date,
            "Lead and follow-up task created"
        );

        Ok(IntakeReceipt {
            lead_id: lead.id,
            score: lead.score,
            follow_up: FollowUpOutcome::Atomic,
            follow_up_task_id: Some(task.id),
        })
    }

    /// Stage 4: lead first, then task. Losing the task is tolerated, losing the lead is not.
    pub async fn create_fallback(
        &self,
        lead: &Lead,
        task: &FollowUpTask,
    ) -> Result<IntakeReceipt, IntakeError> {
        if let Err(err) = self.leads.create(lead).await {
            error!(lead_id = %lead.id, error = %err, "Fallback lead insert failed");
            return Err(IntakeError::Persistence(err));
        }

        match self.leads.create_follow_up(task).await {
            Ok(()) => {
                info!(
                    lead_id = %lead.id,
                    score = %lead.score,
                    "Lead and follow-up task created by fallback path"
                );
                Ok(IntakeReceipt {
                    lead_id: lead.id,
                    score: lead.score,
                    follow_up: FollowUpOutcome::Fallback,
                    follow_up_task_id: Some(task.id),
                })
            }
            Err(err) => {
                error!(
                    lead_id = %lead.id,
                    error = %err,
                    "Follow-up task insert failed, lead saved without a task"
                );
                Ok(IntakeReceipt {
                    lead_id: lead.id,
                    score: lead.score,
                    follow_up: FollowUpOutcome::Missing,
                    follow_up_task_id: None,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{
        create_migrated_test_pool, SqliteLeadFormRepository, SqliteLeadRepository,
    };
    use crate::domain::models::{FollowUpPriority, LeadStatus};
    use crate::domain::ports::LeadFilter;
    use chrono::Duration;

    async fn setup() -> (IntakeService, Arc<SqliteLeadFormRepository>, Arc<SqliteLeadRepository>) {
        let pool = create_migrated_test_pool().await.unwrap();
        let forms = Arc::new(SqliteLeadFormRepository::new(pool.clone()));
        let leads = Arc::new(SqliteLeadRepository::new(pool));
        let service = IntakeService::new(forms.clone(), leads.clone());
        (service, forms, leads)
    }

    #[tokio::test]
    async fn test_submit_creates_lead_and_task_atomically() {
        let (service, forms, leads) = setup().await;
        let form = LeadForm::new(Uuid::new_v4(), "Contact");
        forms.create(&form).await.unwrap();

        let data = LeadData::default()
            .with_field("email", "a@b.com")
            .with_field("phone", "555-0100")
            .with_field("message", "hi");

        let receipt = service
            .submit(LeadSubmission {
                form_id: form.id,
                professional_id: Some(form.professional_id),
                data,
            })
            .await
            .unwrap();

        assert_eq!(receipt.score, LeadScore::Warm);
        assert_eq!(receipt.follow_up, FollowUpOutcome::Atomic);

        let lead = leads.get(receipt.lead_id).await.unwrap().unwrap();
        assert_eq!(lead.status, LeadStatus::New);
        assert_eq!(lead.professional_id, form.professional_id);

        let tasks = leads.get_follow_ups(lead.id).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].priority, FollowUpPriority::High);
        assert_eq!(tasks[0].due_date - lead.created_at, Duration::hours(24));
    }

    #[tokio::test]
    async fn test_inactive_form_is_rejected_without_writes() {
        let (service, forms, leads) = setup().await;
        let form = LeadForm::new(Uuid::new_v4(), "Closed").inactive();
        forms.create(&form).await.unwrap();

        let result = service
            .submit(LeadSubmission {
                form_id: form.id,
                professional_id: None,
                data: LeadData::default().with_field("email", "a@b.com"),
            })
            .await;

        assert!(matches!(result, Err(IntakeError::FormNotFound(id)) if id == form.id));
        assert!(leads.list(LeadFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_form_is_rejected() {
        let (service, _, _) = setup().await;
        let missing = Uuid::new_v4();
        let result = service.validate(missing).await;
        assert!(matches!(result, Err(IntakeError::FormNotFound(id)) if id == missing));
    }

    #[tokio::test]
    async fn test_form_owner_wins_over_claimed_professional() {
        let (service, forms, leads) = setup().await;
        let form = LeadForm::new(Uuid::new_v4(), "Contact");
        forms.create(&form).await.unwrap();

        let receipt = service
            .submit(LeadSubmission {
                form_id: form.id,
                professional_id: Some(Uuid::new_v4()),
                data: LeadData::default(),
            })
            .await
            .unwrap();

        let lead = leads.get(receipt.lead_id).await.unwrap().unwrap();
        assert_eq!(lead.professional_id, form.professional_id);
    }

    #[tokio::test]
    async fn test_fallback_stage_writes_lead_then_task() {
        let (service, forms, leads) = setup().await;
        let form = LeadForm::new(Uuid::new_v4(), "Contact");
        forms.create(&form).await.unwrap();

        let lead = Lead::new(form.id, form.professional_id, LeadData::default(), LeadScore::Cold);
        let task = FollowUpPolicy::build_task(&lead);

        let receipt = service.create_fallback(&lead, &task).await.unwrap();
        assert_eq!(receipt.follow_up, FollowUpOutcome::Fallback);
        assert_eq!(leads.get_follow_ups(lead.id).await.unwrap().len(), 1);
    }
}
