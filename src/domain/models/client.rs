//! Client profile domain model.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Long-lived client record materialized from a converted lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientProfile {
    pub id: Uuid,
    /// Account of the client, once they have signed up
    pub user_id: Option<Uuid>,
    pub professional_id: Uuid,
    /// Lead this profile was converted from; unique across profiles
    pub original_lead_id: Uuid,
    pub client_since: DateTime<Utc>,
    pub total_appointments: u32,
    pub total_spent: f64,
    pub notes: Option<String>,
    pub preferences: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ClientProfile {
    /// Create the profile for a lead being converted for `user_id`.
    pub fn for_conversion(original_lead_id: Uuid, professional_id: Uuid, user_id: Uuid) -> Self {
        let now = Utc::now().trunc_subsecs(6);
        Self {
            id: Uuid::new_v4(),
            user_id: Some(user_id),
            professional_id,
            original_lead_id,
            client_since: now,
            total_appointments: 0,
            total_spent: 0.0,
            notes: None,
            preferences: Value::Object(serde_json::Map::new()),
            created_at: now,
            updated_at: now,
        }
    }
}
