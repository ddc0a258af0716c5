//! SQLite implementation of the LeadFormRepository.

use async_trait::async_trait;
use chrono::{SubsecRound, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::adapters::sqlite::{format_datetime, parse_datetime, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::LeadForm;
use crate::domain::ports::{LeadFormFilter, LeadFormRepository};

const FORM_COLUMNS: &str = "id, professional_id, name, is_active, created_at, updated_at";

#[derive(Clone)]
pub struct SqliteLeadFormRepository {
    pool: SqlitePool,
}

impl SqliteLeadFormRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LeadFormRepository for SqliteLeadFormRepository {
    async fn create(&self, form: &LeadForm) -> DomainResult<()> {
        sqlx::query(
            r#"INSERT INTO lead_forms (id, professional_id, name, is_active, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(form.id.to_string())
        .bind(form.professional_id.to_string())
        .bind(&form.name)
        .bind(form.is_active)
        .bind(format_datetime(&form.created_at))
        .bind(format_datetime(&form.updated_at))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<LeadForm>> {
        let row: Option<LeadFormRow> =
            sqlx::query_as(&format!("SELECT {FORM_COLUMNS} FROM lead_forms WHERE id = ?"))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list(&self, filter: LeadFormFilter) -> DomainResult<Vec<LeadForm>> {
        let mut query = format!("SELECT {FORM_COLUMNS} FROM lead_forms WHERE 1=1");
        let mut bindings: Vec<String> = Vec::new();

        if let Some(professional_id) = filter.professional_id {
            query.push_str(" AND professional_id = ?");
            bindings.push(professional_id.to_string());
        }

        if filter.active_only {
            query.push_str(" AND is_active = 1");
        }

        query.push_str(" ORDER BY created_at DESC");

        let mut q = sqlx::query_as::<_, LeadFormRow>(&query);
        for binding in &bindings {
            q = q.bind(binding);
        }

        let rows: Vec<LeadFormRow> = q.fetch_all(&self.pool).await?;
        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> DomainResult<()> {
        let result = sqlx::query("UPDATE lead_forms SET is_active = ?, updated_at = ? WHERE id = ?")
            .bind(is_active)
            .bind(format_datetime(&Utc::now().trunc_subsecs(6)))
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::FormNotFound(id));
        }

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct LeadFormRow {
    id: String,
    professional_id: String,
    name: String,
    is_active: bool,
    created_at: String,
    updated_at: String,
}

impl TryFrom<LeadFormRow> for LeadForm {
    type Error = DomainError;

    fn try_from(row: LeadFormRow) -> Result<Self, Self::Error> {
        Ok(LeadForm {
            id: parse_uuid(&row.id)?,
            professional_id: parse_uuid(&row.professional_id)?,
            name: row.name,
            is_active: row.is_active,
            created_at: parse_datetime(&row.created_at)?,
            updated_at: parse_datetime(&row.updated_at)?,
        })
    }
}
