use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A lead-capture form owned by a professional.
///
/// Only active forms accept submissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadForm {
    pub id: Uuid,
    pub professional_id: Uuid,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LeadForm {
    pub fn new(professional_id: Uuid, name: impl Into<String>) -> Self {
        let now = Utc::now().trunc_subsecs(6);
        Self {
            id: Uuid::new_v4(),
            professional_id,
            name: name.into(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}
