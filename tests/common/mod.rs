//! Common test utilities for integration tests
//!
//! Provides shared fixtures and fault-injecting ports used across
//! multiple integration test files.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use leadflow::adapters::sqlite::{
    create_migrated_test_pool, SqliteActivityRepository, SqliteClientProfileRepository,
    SqliteLeadFormRepository, SqliteLeadRepository,
};
use leadflow::adapters::Services;
use leadflow::domain::errors::{DomainError, DomainResult};
use leadflow::domain::models::{
    ClientProfile, DispatchError, FollowUpTask, InvitationRequest, InvitationToken, Lead,
    LeadForm,
};
use leadflow::domain::ports::{
    InvitationDispatcher, LeadFilter, LeadFormRepository, LeadRepository,
};

/// Fresh in-memory database with the schema applied.
pub async fn test_pool() -> SqlitePool {
    create_migrated_test_pool()
        .await
        .expect("failed to create migrated test pool")
}

/// Insert a form owned by a new professional.
pub async fn seed_form(pool: &SqlitePool, active: bool) -> LeadForm {
    let mut form = LeadForm::new(Uuid::new_v4(), "Contact us");
    if !active {
        form = form.inactive();
    }
    SqliteLeadFormRepository::new(pool.clone())
        .create(&form)
        .await
        .expect("failed to seed form");
    form
}

pub async fn count_rows(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .expect("failed to count rows")
}

/// Which writes a [`FaultyLeadRepository`] should refuse.
#[derive(Debug, Clone, Copy, Default)]
pub struct Faults {
    pub atomic: bool,
    pub lead_insert: bool,
    pub task_insert: bool,
}

/// SQLite lead repository that fails selected writes on demand.
pub struct FaultyLeadRepository {
    inner: SqliteLeadRepository,
    faults: Faults,
}

impl FaultyLeadRepository {
    pub fn new(pool: SqlitePool, faults: Faults) -> Self {
        Self {
            inner: SqliteLeadRepository::new(pool),
            faults,
        }
    }
}

fn injected(what: &str) -> DomainError {
    DomainError::DatabaseError(format!("injected failure: {what}"))
}

#[async_trait]
impl LeadRepository for FaultyLeadRepository {
    async fn create_with_follow_up(&self, lead: &Lead, task: &FollowUpTask) -> DomainResult<()> {
        if self.faults.atomic {
            return Err(injected("transaction"));
        }
        self.inner.create_with_follow_up(lead, task).await
    }

    async fn create(&self, lead: &Lead) -> DomainResult<()> {
        if self.faults.lead_insert {
            return Err(injected("lead insert"));
        }
        self.inner.create(lead).await
    }

    async fn create_follow_up(&self, task: &FollowUpTask) -> DomainResult<()> {
        if self.faults.task_insert {
            return Err(injected("task insert"));
        }
        self.inner.create_follow_up(task).await
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<Lead>> {
        self.inner.get(id).await
    }

    async fn list(&self, filter: LeadFilter) -> DomainResult<Vec<Lead>> {
        self.inner.list(filter).await
    }

    async fn get_follow_ups(&self, lead_id: Uuid) -> DomainResult<Vec<FollowUpTask>> {
        self.inner.get_follow_ups(lead_id).await
    }

    async fn mark_contacted(&self, id: Uuid) -> DomainResult<()> {
        self.inner.mark_contacted(id).await
    }

    async fn convert_to_client(
        &self,
        profile: &ClientProfile,
        user_id: Uuid,
        conversion_date: DateTime<Utc>,
    ) -> DomainResult<()> {
        self.inner
            .convert_to_client(profile, user_id, conversion_date)
            .await
    }
}

/// Dispatcher that replays a fixed outcome and records every request.
pub struct StubDispatcher {
    outcome: Result<InvitationToken, DispatchError>,
    calls: AtomicUsize,
    requests: Mutex<Vec<InvitationRequest>>,
}

impl StubDispatcher {
    pub fn succeeding(token: &str) -> Self {
        Self::with_outcome(Ok(InvitationToken::new(token)))
    }

    pub fn failing(err: DispatchError) -> Self {
        Self::with_outcome(Err(err))
    }

    fn with_outcome(outcome: Result<InvitationToken, DispatchError>) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<InvitationRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl InvitationDispatcher for StubDispatcher {
    async fn dispatch(&self, request: &InvitationRequest) -> Result<InvitationToken, DispatchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        self.outcome.clone()
    }
}

/// Services over SQLite, with the lead repository and dispatcher supplied by the test.
pub fn services_with(
    pool: &SqlitePool,
    leads: Arc<dyn LeadRepository>,
    dispatcher: Arc<dyn InvitationDispatcher>,
) -> Services {
    Services::new(
        Arc::new(SqliteLeadFormRepository::new(pool.clone())),
        leads,
        Arc::new(SqliteActivityRepository::new(pool.clone())),
        Arc::new(SqliteClientProfileRepository::new(pool.clone())),
        dispatcher,
    )
}
