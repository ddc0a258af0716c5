//! Lead activity domain model.
//!
//! Activities form an append-only audit trail of actions taken against a lead.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

/// Kind of action recorded against a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    EmailSent,
    CallMade,
    MeetingScheduled,
    NoteAdded,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmailSent => "email_sent",
            Self::CallMade => "call_made",
            Self::MeetingScheduled => "meeting_scheduled",
            Self::NoteAdded => "note_added",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "email_sent" => Some(Self::EmailSent),
            "call_made" => Some(Self::CallMade),
            "meeting_scheduled" => Some(Self::MeetingScheduled),
            "note_added" => Some(Self::NoteAdded),
            _ => None,
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry in a lead's activity log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadActivity {
    pub id: Uuid,
    pub lead_id: Uuid,
    pub professional_id: Uuid,
    pub activity_type: ActivityType,
    pub activity_data: Value,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LeadActivity {
    pub fn new(
        lead_id: Uuid,
        professional_id: Uuid,
        activity_type: ActivityType,
        activity_data: Value,
    ) -> Self {
        let now = Utc::now().trunc_subsecs(6);
        Self {
            id: Uuid::new_v4(),
            lead_id,
            professional_id,
            activity_type,
            activity_data,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}
