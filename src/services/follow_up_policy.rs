//! Follow-up policy: what a lead's score obliges the professional to do.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::domain::models::{FollowUpPriority, FollowUpTask, Lead, LeadScore};

/// Due-date offset, priority and title derived from a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowUpPolicy {
    pub due_in: Duration,
    pub priority: FollowUpPriority,
    pub title: &'static str,
}

impl FollowUpPolicy {
    pub fn for_score(score: LeadScore) -> Self {
        match score {
            LeadScore::Hot => Self {
                due_in: Duration::hours(1),
                priority: FollowUpPriority::Urgent,
                title: "URGENT: Contact hot lead within 1 hour",
            },
            LeadScore::Warm => Self {
                due_in: Duration::days(1),
                priority: FollowUpPriority::High,
                title: "Follow up with warm lead within 24 hours",
            },
            LeadScore::Cold => Self {
                due_in: Duration::days(3),
                priority: FollowUpPriority::Medium,
                title: "Follow up with lead within 3 days",
            },
        }
    }

    pub fn due_date(&self, created_at: DateTime<Utc>) -> DateTime<Utc> {
        created_at + self.due_in
    }

    /// Build the intake follow-up task for a freshly scored lead.
    ///
    /// The due date counts from the lead's creation time.
    pub fn build_task(lead: &Lead) -> FollowUpTask {
        let policy = Self::for_score(lead.score);
        FollowUpTask {
            id: Uuid::new_v4(),
            lead_id: lead.id,
            professional_id: lead.professional_id,
            task_type: FollowUpTask::INTAKE_TASK_TYPE.to_string(),
            title: policy.title.to_string(),
            description: describe(lead),
            due_date: policy.due_date(lead.created_at),
            priority: policy.priority,
            created_at: lead.created_at,
        }
    }
}

fn describe(lead: &Lead) -> String {
    let who = lead.data.name().unwrap_or("A new lead");
    let mut channels = Vec::new();
    if let Some(email) = lead.data.email() {
        channels.push(format!("email {email}"));
    }
    if let Some(phone) = lead.data.phone() {
        channels.push(format!("phone {phone}"));
    }

    if channels.is_empty() {
        format!("{who} submitted your form ({} lead). No contact details were provided.", lead.score)
    } else {
        format!(
            "{who} submitted your form ({} lead). Reach them by {}.",
            lead.score,
            channels.join(" or ")
        )
    }
}
