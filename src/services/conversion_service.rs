//! Conversion workflow: invite a lead, then turn them into a client profile.

use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    ActivityType, ClientProfile, DispatchError, InvitationRequest, InvitationToken, Lead, LeadData,
    LeadStatus,
};
use crate::domain::ports::{InvitationDispatcher, LeadRepository};
use crate::infrastructure::logging::mask_contact;
use crate::services::activity_service::ActivityService;

pub struct ConversionService {
    leads: Arc<dyn LeadRepository>,
    dispatcher: Arc<dyn InvitationDispatcher>,
    activity: Arc<ActivityService>,
}

impl ConversionService {
    pub fn new(
        leads: Arc<dyn LeadRepository>,
        dispatcher: Arc<dyn InvitationDispatcher>,
        activity: Arc<ActivityService>,
    ) -> Self {
        Self {
            leads,
            dispatcher,
            activity,
        }
    }

    /// Ask the notifier to invite a lead, using the contact data supplied by the caller.
    ///
    /// A dispatch failure never changes the lead.
    #[instrument(skip(self, lead_data, custom_message))]
    pub async fn send_invitation(
        &self,
        lead_id: Uuid,
        lead_data: &LeadData,
        custom_message: Option<String>,
    ) -> DomainResult<InvitationToken> {
        let lead = self.load_convertible(lead_id).await?;
        self.dispatch_invitation(&lead, lead_data, custom_message).await
    }

    /// Invite a lead using the contact data stored at intake.
    pub async fn invite_lead(
        &self,
        lead_id: Uuid,
        custom_message: Option<String>,
    ) -> DomainResult<InvitationToken> {
        let lead = self.load_convertible(lead_id).await?;
        self.dispatch_invitation(&lead, &lead.data, custom_message).await
    }

    async fn dispatch_invitation(
        &self,
        lead: &Lead,
        lead_data: &LeadData,
        custom_message: Option<String>,
    ) -> DomainResult<InvitationToken> {
        let lead_id = lead.id;
        let Some(email) = lead_data.email() else {
            warn!(lead_id = %lead_id, "Invitation requested for lead without an email address");
            return Err(DispatchError::MissingRecipient.into());
        };

        let request = InvitationRequest {
            lead_id,
            lead_data: lead_data.clone(),
            custom_message,
        };

        let token = match self.dispatcher.dispatch(&request).await {
            Ok(token) => token,
            Err(err) => {
                warn!(
                    lead_id = %lead_id,
                    error = %err,
                    user_message = err.user_message(),
                    "Invitation dispatch failed"
                );
                return Err(err.into());
            }
        };

        info!(lead_id = %lead_id, recipient = %mask_contact(email), "Invitation sent");

        self.activity
            .record_best_effort(
                lead.id,
                lead.professional_id,
                ActivityType::EmailSent,
                json!({ "kind": "invitation", "recipient": email }),
            )
            .await;

        Ok(token)
    }

    /// Create the client profile for `user_id` and mark the lead converted.
    ///
    /// Both writes happen in one transaction that only commits while the lead is still
    /// unconverted, so two racing conversions produce exactly one profile.
    #[instrument(skip(self))]
    pub async fn convert_lead_to_client(
        &self,
        lead_id: Uuid,
        user_id: Uuid,
    ) -> DomainResult<ClientProfile> {
        let lead = self.load_convertible(lead_id).await?;

        let profile = ClientProfile::for_conversion(lead.id, lead.professional_id, user_id);

        if let Err(err) = self
            .leads
            .convert_to_client(&profile, user_id, profile.client_since)
            .await
        {
            error!(lead_id = %lead_id, user_id = %user_id, error = %err, "Lead conversion failed");
            return Err(err);
        }

        info!(
            lead_id = %lead_id,
            user_id = %user_id,
            client_profile_id = %profile.id,
            "Lead converted to client"
        );

        self.activity
            .record_best_effort(
                lead.id,
                lead.professional_id,
                ActivityType::NoteAdded,
                json!({
                    "event": "converted",
                    "user_id": user_id,
                    "client_profile_id": profile.id,
                }),
            )
            .await;

        Ok(profile)
    }

    async fn load_convertible(&self, lead_id: Uuid) -> DomainResult<Lead> {
        let lead = self
            .leads
            .get(lead_id)
            .await?
            .ok_or(DomainError::LeadNotFound(lead_id))?;

        if !lead.status.can_transition_to(LeadStatus::Converted) {
            warn!(lead_id = %lead_id, status = %lead.status, "Lead is already converted");
            return Err(DomainError::LeadAlreadyConverted(lead_id));
        }

        Ok(lead)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::dispatcher::UnconfiguredDispatcher;
    use crate::adapters::sqlite::{
        create_migrated_test_pool, SqliteActivityRepository, SqliteLeadFormRepository,
        SqliteLeadRepository,
    };
    use crate::domain::models::{LeadForm, LeadScore};
    use crate::domain::ports::LeadFormRepository;

    async fn setup() -> (ConversionService, Arc<SqliteLeadRepository>, Lead) {
        let pool = create_migrated_test_pool().await.unwrap();
        let form = LeadForm::new(Uuid::new_v4(), "Consultation");
        SqliteLeadFormRepository::new(pool.clone())
            .create(&form)
            .await
            .unwrap();

        let leads = Arc::new(SqliteLeadRepository::new(pool.clone()));
        let data = LeadData::default().with_field("email", "dana@example.com");
        let lead = Lead::new(form.id, form.professional_id, data, LeadScore::Cold);
        leads.create(&lead).await.unwrap();

        let service = ConversionService::new(
            leads.clone(),
            Arc::new(UnconfiguredDispatcher),
            Arc::new(ActivityService::new(Arc::new(SqliteActivityRepository::new(pool)))),
        );
        (service, leads, lead)
    }

    #[tokio::test]
    async fn test_unconfigured_notifier_leaves_lead_unchanged() {
        let (service, leads, lead) = setup().await;

        let err = service.invite_lead(lead.id, None).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::Dispatch(DispatchError::NotifierUnconfigured)
        ));

        let stored = leads.get(lead.id).await.unwrap().unwrap();
        assert_eq!(stored.status, LeadStatus::New);
    }

    #[tokio::test]
    async fn test_converted_lead_cannot_be_invited() {
        let (service, _leads, lead) = setup().await;

        service
            .convert_lead_to_client(lead.id, Uuid::new_v4())
            .await
            .unwrap();
        let err = service.invite_lead(lead.id, None).await.unwrap_err();
        assert!(matches!(err, DomainError::LeadAlreadyConverted(_)));
    }
}
