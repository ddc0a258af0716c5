//! Follow-up task domain model.
//!
//! A follow-up task is the contact obligation derived from a lead's score at intake.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Urgency of a follow-up task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowUpPriority {
    Medium,
    High,
    Urgent,
}

impl FollowUpPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "urgent" => Some(Self::Urgent),
            _ => None,
        }
    }
}

impl fmt::Display for FollowUpPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scheduled obligation to contact a lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowUpTask {
    pub id: Uuid,
    pub lead_id: Uuid,
    pub professional_id: Uuid,
    pub task_type: String,
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub priority: FollowUpPriority,
    pub created_at: DateTime<Utc>,
}

impl FollowUpTask {
    /// Task type used for every task created at intake.
    pub const INTAKE_TASK_TYPE: &'static str = "follow_up";

    /// Whether the task is past due at the given instant.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.due_date < now
    }
}
