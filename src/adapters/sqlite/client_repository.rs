//! SQLite implementation of the ClientProfileRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::adapters::sqlite::{parse_datetime, parse_optional_uuid, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::ClientProfile;
use crate::domain::ports::ClientProfileRepository;

const PROFILE_COLUMNS: &str = "id, user_id, professional_id, original_lead_id, client_since, \
                               total_appointments, total_spent, notes, preferences, created_at, updated_at";

#[derive(Clone)]
pub struct SqliteClientProfileRepository {
    pool: SqlitePool,
}

impl SqliteClientProfileRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClientProfileRepository for SqliteClientProfileRepository {
    async fn get(&self, id: Uuid) -> DomainResult<Option<ClientProfile>> {
        let row: Option<ClientProfileRow> = sqlx::query_as(&format!(
            "SELECT {PROFILE_COLUMNS} FROM client_profiles WHERE id = ?"
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn get_by_lead(&self, lead_id: Uuid) -> DomainResult<Option<ClientProfile>> {
        let row: Option<ClientProfileRow> = sqlx::query_as(&format!(
            "SELECT {PROFILE_COLUMNS} FROM client_profiles WHERE original_lead_id = ?"
        ))
        .bind(lead_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list_by_professional(&self, professional_id: Uuid) -> DomainResult<Vec<ClientProfile>> {
        let rows: Vec<ClientProfileRow> = sqlx::query_as(&format!(
            "SELECT {PROFILE_COLUMNS} FROM client_profiles WHERE professional_id = ? \
             ORDER BY client_since DESC"
        ))
        .bind(professional_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}

#[derive(sqlx::FromRow)]
struct ClientProfileRow {
    id: String,
    user_id: Option<String>,
    professional_id: String,
    original_lead_id: String,
    client_since: String,
    total_appointments: i64,
    total_spent: f64,
    notes: Option<String>,
    preferences: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<ClientProfileRow> for ClientProfile {
    type Error = DomainError;

    fn try_from(row: ClientProfileRow) -> Result<Self, Self::Error> {
        let total_appointments = u32::try_from(row.total_appointments).map_err(|_| {
            DomainError::SerializationError(format!(
                "Invalid appointment count: {}",
                row.total_appointments
            ))
        })?;

        Ok(ClientProfile {
            id: parse_uuid(&row.id)?,
            user_id: parse_optional_uuid(row.user_id)?,
            professional_id: parse_uuid(&row.professional_id)?,
            original_lead_id: parse_uuid(&row.original_lead_id)?,
            client_since: parse_datetime(&row.client_since)?,
            total_appointments,
            total_spent: row.total_spent,
            notes: row.notes,
            preferences: serde_json::from_str(&row.preferences)?,
            created_at: parse_datetime(&row.created_at)?,
            updated_at: parse_datetime(&row.updated_at)?,
        })
    }
}
