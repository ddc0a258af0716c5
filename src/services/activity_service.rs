//! Activity recorder: append-only audit trail of actions taken against a lead.

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::{ActivityType, LeadActivity};
use crate::domain::ports::ActivityRepository;

pub struct ActivityService {
    activities: Arc<dyn ActivityRepository>,
}

impl ActivityService {
    pub fn new(activities: Arc<dyn ActivityRepository>) -> Self {
        Self { activities }
    }

    /// Append an activity and hand the error back to the caller.
    pub async fn record(
        &self,
        lead_id: Uuid,
        professional_id: Uuid,
        activity_type: ActivityType,
        activity_data: Value,
        notes: Option<String>,
    ) -> DomainResult<LeadActivity> {
        let mut activity = LeadActivity::new(lead_id, professional_id, activity_type, activity_data);
        activity.notes = notes;

        if let Err(err) = self.activities.append(&activity).await {
            warn!(
                lead_id = %lead_id,
                activity_type = %activity_type,
                error = %err,
                "Failed to record lead activity"
            );
            return Err(err);
        }

        debug!(
            lead_id = %lead_id,
            activity_id = %activity.id,
            activity_type = %activity_type,
            "Recorded lead activity"
        );
        Ok(activity)
    }

    /// Append an activity on behalf of another workflow.
    ///
    /// A failure is logged and swallowed; it never undoes the action being logged.
    pub async fn record_best_effort(
        &self,
        lead_id: Uuid,
        professional_id: Uuid,
        activity_type: ActivityType,
        activity_data: Value,
    ) -> Option<LeadActivity> {
        self.record(lead_id, professional_id, activity_type, activity_data, None)
            .await
            .ok()
    }

    /// Activities for a lead, newest first.
    pub async fn list_for_lead(&self, lead_id: Uuid) -> DomainResult<Vec<LeadActivity>> {
        self.activities.list_for_lead(lead_id).await
    }
}
