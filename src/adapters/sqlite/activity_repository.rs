//! SQLite implementation of the ActivityRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::adapters::sqlite::{format_datetime, parse_datetime, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{ActivityType, LeadActivity};
use crate::domain::ports::ActivityRepository;

#[derive(Clone)]
pub struct SqliteActivityRepository {
    pool: SqlitePool,
}

impl SqliteActivityRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityRepository for SqliteActivityRepository {
    async fn append(&self, activity: &LeadActivity) -> DomainResult<()> {
        let data_json = serde_json::to_string(&activity.activity_data)?;

        sqlx::query(
            r#"INSERT INTO lead_activities (id, lead_id, professional_id, activity_type, activity_data, notes, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(activity.id.to_string())
        .bind(activity.lead_id.to_string())
        .bind(activity.professional_id.to_string())
        .bind(activity.activity_type.as_str())
        .bind(&data_json)
        .bind(&activity.notes)
        .bind(format_datetime(&activity.created_at))
        .bind(format_datetime(&activity.updated_at))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_for_lead(&self, lead_id: Uuid) -> DomainResult<Vec<LeadActivity>> {
        // rowid breaks ties between activities recorded in the same microsecond
        let rows: Vec<ActivityRow> = sqlx::query_as(
            r#"SELECT id, lead_id, professional_id, activity_type, activity_data, notes, created_at, updated_at
               FROM lead_activities WHERE lead_id = ?
               ORDER BY created_at DESC, rowid DESC"#,
        )
        .bind(lead_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}

#[derive(sqlx::FromRow)]
struct ActivityRow {
    id: String,
    lead_id: String,
    professional_id: String,
    activity_type: String,
    activity_data: String,
    notes: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<ActivityRow> for LeadActivity {
    type Error = DomainError;

    fn try_from(row: ActivityRow) -> Result<Self, Self::Error> {
        let activity_type = ActivityType::from_str(&row.activity_type).ok_or_else(|| {
            DomainError::SerializationError(format!("Invalid activity type: {}", row.activity_type))
        })?;

        Ok(LeadActivity {
            id: parse_uuid(&row.id)?,
            lead_id: parse_uuid(&row.lead_id)?,
            professional_id: parse_uuid(&row.professional_id)?,
            activity_type,
            activity_data: serde_json::from_str(&row.activity_data)?,
            notes: row.notes,
            created_at: parse_datetime(&row.created_at)?,
            updated_at: parse_datetime(&row.updated_at)?,
        })
    }
}
