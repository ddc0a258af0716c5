//! SQLite implementation of the LeadRepository.
//!
//! Holds the two transactional writes of the pipeline: lead + follow-up task at intake, and
//! client profile + lead status at conversion.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::adapters::sqlite::{
    format_datetime, parse_datetime, parse_optional_datetime, parse_optional_uuid, parse_uuid,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    ClientProfile, FollowUpPriority, FollowUpTask, Lead, LeadData, LeadScore, LeadStatus,
};
use crate::domain::ports::{LeadFilter, LeadRepository};

const LEAD_COLUMNS: &str = "id, form_id, professional_id, data, score, status, \
                            converted_to_user_id, conversion_date, created_at";

const TASK_COLUMNS: &str = "id, lead_id, professional_id, task_type, title, description, \
                            due_date, priority, created_at";

#[derive(Clone)]
pub struct SqliteLeadRepository {
    pool: SqlitePool,
}

impl SqliteLeadRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

async fn insert_lead<'e, E>(executor: E, lead: &Lead) -> DomainResult<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    let data_json = serde_json::to_string(&lead.data)?;

    sqlx::query(
        r#"INSERT INTO leads (id, form_id, professional_id, data, score, status, converted_to_user_id, conversion_date, created_at)
           VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
    )
    .bind(lead.id.to_string())
    .bind(lead.form_id.to_string())
    .bind(lead.professional_id.to_string())
    .bind(&data_json)
    .bind(lead.score.as_str())
    .bind(lead.status.as_str())
    .bind(lead.converted_to_user_id.map(|id| id.to_string()))
    .bind(lead.conversion_date.as_ref().map(format_datetime))
    .bind(format_datetime(&lead.created_at))
    .execute(executor)
    .await?;

    Ok(())
}

async fn insert_follow_up<'e, E>(executor: E, task: &FollowUpTask) -> DomainResult<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"INSERT INTO follow_up_tasks (id, lead_id, professional_id, task_type, title, description, due_date, priority, created_at)
           VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
    )
    .bind(task.id.to_string())
    .bind(task.lead_id.to_string())
    .bind(task.professional_id.to_string())
    .bind(&task.task_type)
    .bind(&task.title)
    .bind(&task.description)
    .bind(format_datetime(&task.due_date))
    .bind(task.priority.as_str())
    .bind(format_datetime(&task.created_at))
    .execute(executor)
    .await?;

    Ok(())
}

#[async_trait]
impl LeadRepository for SqliteLeadRepository {
    async fn create_with_follow_up(&self, lead: &Lead, task: &FollowUpTask) -> DomainResult<()> {
        let mut tx = self.pool.begin().await?;

        // Dropping the transaction on an early return rolls both inserts back
        insert_lead(&mut *tx, lead).await?;
        insert_follow_up(&mut *tx, task).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn create(&self, lead: &Lead) -> DomainResult<()> {
        insert_lead(&self.pool, lead).await
    }

    async fn create_follow_up(&self, task: &FollowUpTask) -> DomainResult<()> {
        insert_follow_up(&self.pool, task).await
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<Lead>> {
        let row: Option<LeadRow> =
            sqlx::query_as(&format!("SELECT {LEAD_COLUMNS} FROM leads WHERE id = ?"))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list(&self, filter: LeadFilter) -> DomainResult<Vec<Lead>> {
        let mut query = format!("SELECT {LEAD_COLUMNS} FROM leads WHERE 1=1");
        let mut bindings: Vec<String> = Vec::new();

        if let Some(form_id) = filter.form_id {
            query.push_str(" AND form_id = ?");
            bindings.push(form_id.to_string());
        }

        if let Some(professional_id) = filter.professional_id {
            query.push_str(" AND professional_id = ?");
            bindings.push(professional_id.to_string());
        }

        if let Some(status) = filter.status {
            query.push_str(" AND status = ?");
            bindings.push(status.as_str().to_string());
        }

        if let Some(score) = filter.score {
            query.push_str(" AND score = ?");
            bindings.push(score.as_str().to_string());
        }

        query.push_str(" ORDER BY created_at DESC, rowid DESC");

        if let Some(limit) = filter.limit {
            query.push_str(&format!(" LIMIT {}", limit.max(0)));
        }

        let mut q = sqlx::query_as::<_, LeadRow>(&query);
        for binding in &bindings {
            q = q.bind(binding);
        }

        let rows: Vec<LeadRow> = q.fetch_all(&self.pool).await?;
        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn get_follow_ups(&self, lead_id: Uuid) -> DomainResult<Vec<FollowUpTask>> {
        let rows: Vec<FollowUpTaskRow> = sqlx::query_as(&format!(
            "SELECT {TASK_COLUMNS} FROM follow_up_tasks WHERE lead_id = ? ORDER BY due_date ASC"
        ))
        .bind(lead_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn mark_contacted(&self, id: Uuid) -> DomainResult<()> {
        let result = sqlx::query("UPDATE leads SET status = 'contacted' WHERE id = ? AND status = 'new'")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            let lead = self.get(id).await?.ok_or(DomainError::LeadNotFound(id))?;
            return Err(DomainError::InvalidStateTransition {
                from: lead.status.as_str().to_string(),
                to: LeadStatus::Contacted.as_str().to_string(),
                reason: "only new leads can be marked contacted".to_string(),
            });
        }

        Ok(())
    }

    async fn convert_to_client(
        &self,
        profile: &ClientProfile,
        user_id: Uuid,
        conversion_date: DateTime<Utc>,
    ) -> DomainResult<()> {
        let lead_id = profile.original_lead_id;
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"UPDATE leads SET status = 'converted', converted_to_user_id = ?, conversion_date = ?
               WHERE id = ? AND status IN ('new', 'contacted')"#,
        )
        .bind(user_id.to_string())
        .bind(format_datetime(&conversion_date))
        .bind(lead_id.to_string())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            let exists: Option<(String,)> = sqlx::query_as("SELECT status FROM leads WHERE id = ?")
                .bind(lead_id.to_string())
                .fetch_optional(&mut *tx)
                .await?;
            tx.rollback().await?;

            return Err(match exists {
                Some(_) => DomainError::LeadAlreadyConverted(lead_id),
                None => DomainError::LeadNotFound(lead_id),
            });
        }

        let preferences_json = serde_json::to_string(&profile.preferences)?;

        let inserted = sqlx::query(
            r#"INSERT INTO client_profiles (id, user_id, professional_id, original_lead_id, client_since,
                   total_appointments, total_spent, notes, preferences, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(profile.id.to_string())
        .bind(profile.user_id.map(|id| id.to_string()))
        .bind(profile.professional_id.to_string())
        .bind(lead_id.to_string())
        .bind(format_datetime(&profile.client_since))
        .bind(i64::from(profile.total_appointments))
        .bind(profile.total_spent)
        .bind(&profile.notes)
        .bind(&preferences_json)
        .bind(format_datetime(&profile.created_at))
        .bind(format_datetime(&profile.updated_at))
        .execute(&mut *tx)
        .await;

        match inserted {
            Ok(_) => {}
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                tx.rollback().await?;
                return Err(DomainError::LeadAlreadyConverted(lead_id));
            }
            Err(err) => return Err(err.into()),
        }

        tx.commit().await?;
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct LeadRow {
    id: String,
    form_id: String,
    professional_id: String,
    data: String,
    score: String,
    status: String,
    converted_to_user_id: Option<String>,
    conversion_date: Option<String>,
    created_at: String,
}

impl TryFrom<LeadRow> for Lead {
    type Error = DomainError;

    fn try_from(row: LeadRow) -> Result<Self, Self::Error> {
        let score = LeadScore::from_str(&row.score).ok_or_else(|| {
            DomainError::SerializationError(format!("Invalid score: {}", row.score))
        })?;

        let status = LeadStatus::from_str(&row.status).ok_or_else(|| {
            DomainError::SerializationError(format!("Invalid status: {}", row.status))
        })?;

        let data: LeadData = serde_json::from_str(&row.data)?;

        Ok(Lead {
            id: parse_uuid(&row.id)?,
            form_id: parse_uuid(&row.form_id)?,
            professional_id: parse_uuid(&row.professional_id)?,
            data,
            score,
            status,
            converted_to_user_id: parse_optional_uuid(row.converted_to_user_id)?,
            conversion_date: parse_optional_datetime(row.conversion_date)?,
            created_at: parse_datetime(&row.created_at)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct FollowUpTaskRow {
    id: String,
    lead_id: String,
    professional_id: String,
    task_type: String,
    title: String,
    description: String,
    due_date: String,
    priority: String,
    created_at: String,
}

impl TryFrom<FollowUpTaskRow> for FollowUpTask {
    type Error = DomainError;

    fn try_from(row: FollowUpTaskRow) -> Result<Self, Self::Error> {
        let priority = FollowUpPriority::from_str(&row.priority).ok_or_else(|| {
            DomainError::SerializationError(format!("Invalid priority: {}", row.priority))
        })?;

        Ok(FollowUpTask {
            id: parse_uuid(&row.id)?,
            lead_id: parse_uuid(&row.lead_id)?,
            professional_id: parse_uuid(&row.professional_id)?,
            task_type: row.task_type,
            title: row.title,
            description: row.description,
            due_date: parse_datetime(&row.due_date)?,
            priority,
            created_at: parse_datetime(&row.created_at)?,
        })
    }
}
