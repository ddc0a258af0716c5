//! End-to-end intake pipeline tests over SQLite.

mod common;

use chrono::Duration;
use std::sync::Arc;

use common::{count_rows, seed_form, services_with, test_pool, Faults, FaultyLeadRepository, StubDispatcher};
use leadflow::adapters::sqlite::SqliteLeadRepository;
use leadflow::domain::models::{FollowUpPriority, LeadData, LeadScore, LeadStatus};
use leadflow::services::{FollowUpOutcome, IntakeError, LeadSubmission};

fn submission(form_id: uuid::Uuid, data: LeadData) -> LeadSubmission {
    LeadSubmission {
        form_id,
        professional_id: None,
        data,
    }
}

#[tokio::test]
async fn test_warm_lead_gets_high_priority_task_due_in_24_hours() {
    let pool = test_pool().await;
    let form = seed_form(&pool, true).await;
    let services = services_with(
        &pool,
        Arc::new(SqliteLeadRepository::new(pool.clone())),
        Arc::new(StubDispatcher::succeeding("tok")),
    );

    let data = LeadData::default()
        .with_field("email", "a@b.com")
        .with_field("phone", "555-0100")
        .with_field("message", "hi");
    let receipt = services.intake.submit(submission(form.id, data)).await.unwrap();

    assert_eq!(receipt.score, LeadScore::Warm);
    assert_eq!(receipt.follow_up, FollowUpOutcome::Atomic);

    let lead = services.leads.require_lead(receipt.lead_id).await.unwrap();
    assert_eq!(lead.status, LeadStatus::New);
    assert_eq!(lead.professional_id, form.professional_id);

    let tasks = services.leads.follow_ups(lead.id).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].priority, FollowUpPriority::High);
    assert_eq!(tasks[0].due_date, lead.created_at + Duration::hours(24));
}

#[tokio::test]
async fn test_long_message_is_hot_and_urgent_within_the_hour() {
    let pool = test_pool().await;
    let form = seed_form(&pool, true).await;
    let services = services_with(
        &pool,
        Arc::new(SqliteLeadRepository::new(pool.clone())),
        Arc::new(StubDispatcher::succeeding("tok")),
    );

    let data = LeadData::default().with_field("message", "x".repeat(61));
    let receipt = services.intake.submit(submission(form.id, data)).await.unwrap();
    assert_eq!(receipt.score, LeadScore::Hot);

    let lead = services.leads.require_lead(receipt.lead_id).await.unwrap();
    let tasks = services.leads.follow_ups(lead.id).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].priority, FollowUpPriority::Urgent);
    assert!(tasks[0].title.starts_with("URGENT"));
    assert_eq!(tasks[0].due_date, lead.created_at + Duration::hours(1));
}

#[tokio::test]
async fn test_inactive_form_rejects_without_writing() {
    let pool = test_pool().await;
    let form = seed_form(&pool, false).await;
    let services = services_with(
        &pool,
        Arc::new(SqliteLeadRepository::new(pool.clone())),
        Arc::new(StubDispatcher::succeeding("tok")),
    );

    let data = LeadData::default().with_field("email", "a@b.com");
    let err = services.intake.submit(submission(form.id, data)).await.unwrap_err();

    assert!(matches!(err, IntakeError::FormNotFound(id) if id == form.id));
    assert_eq!(count_rows(&pool, "leads").await, 0);
    assert_eq!(count_rows(&pool, "follow_up_tasks").await, 0);
}

#[tokio::test]
async fn test_unknown_form_is_rejected() {
    let pool = test_pool().await;
    let services = services_with(
        &pool,
        Arc::new(SqliteLeadRepository::new(pool.clone())),
        Arc::new(StubDispatcher::succeeding("tok")),
    );

    let err = services
        .intake
        .submit(submission(uuid::Uuid::new_v4(), LeadData::default()))
        .await
        .unwrap_err();
    assert!(matches!(err, IntakeError::FormNotFound(_)));
}

#[tokio::test]
async fn test_failed_transaction_falls_back_to_sequential_inserts() {
    let pool = test_pool().await;
    let form = seed_form(&pool, true).await;
    let leads = FaultyLeadRepository::new(
        pool.clone(),
        Faults {
            atomic: true,
            ..Faults::default()
        },
    );
    let services = services_with(&pool, Arc::new(leads), Arc::new(StubDispatcher::succeeding("tok")));

    let receipt = services
        .intake
        .submit(submission(form.id, LeadData::default().with_field("email", "a@b.com")))
        .await
        .unwrap();

    assert_eq!(receipt.follow_up, FollowUpOutcome::Fallback);
    assert_eq!(receipt.score, LeadScore::Cold);
    assert!(services.leads.get_lead(receipt.lead_id).await.unwrap().is_some());
    assert_eq!(services.leads.follow_ups(receipt.lead_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_fallback_tolerates_lost_follow_up_task() {
    let pool = test_pool().await;
    let form = seed_form(&pool, true).await;
    let leads = FaultyLeadRepository::new(
        pool.clone(),
        Faults {
            atomic: true,
            task_insert: true,
            ..Faults::default()
        },
    );
    let services = services_with(&pool, Arc::new(leads), Arc::new(StubDispatcher::succeeding("tok")));

    let receipt = services
        .intake
        .submit(submission(form.id, LeadData::default().with_field("message", "hello")))
        .await
        .unwrap();

    assert_eq!(receipt.follow_up, FollowUpOutcome::Missing);
    assert!(receipt.follow_up_task_id.is_none());
    assert!(services.leads.get_lead(receipt.lead_id).await.unwrap().is_some());
    assert!(services.leads.follow_ups(receipt.lead_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_fallback_lead_insert_failure_is_surfaced() {
    let pool = test_pool().await;
    let form = seed_form(&pool, true).await;
    let leads = FaultyLeadRepository::new(
        pool.clone(),
        Faults {
            atomic: true,
            lead_insert: true,
            task_insert: false,
        },
    );
    let services = services_with(&pool, Arc::new(leads), Arc::new(StubDispatcher::succeeding("tok")));

    let err = services
        .intake
        .submit(submission(form.id, LeadData::default()))
        .await
        .unwrap_err();

    assert!(matches!(err, IntakeError::Persistence(_)));
    assert_eq!(count_rows(&pool, "leads").await, 0);
}

#[tokio::test]
async fn test_identical_resubmission_creates_two_leads() {
    let pool = test_pool().await;
    let form = seed_form(&pool, true).await;
    let services = services_with(
        &pool,
        Arc::new(SqliteLeadRepository::new(pool.clone())),
        Arc::new(StubDispatcher::succeeding("tok")),
    );

    let data = LeadData::default()
        .with_field("email", "a@b.com")
        .with_field("phone", "555-0100");
    let first = services.intake.submit(submission(form.id, data.clone())).await.unwrap();
    let second = services.intake.submit(submission(form.id, data)).await.unwrap();

    assert_ne!(first.lead_id, second.lead_id);
    assert_eq!(count_rows(&pool, "leads").await, 2);
    assert_eq!(count_rows(&pool, "follow_up_tasks").await, 2);
}

#[tokio::test]
async fn test_claimed_professional_is_ignored_in_favor_of_form_owner() {
    let pool = test_pool().await;
    let form = seed_form(&pool, true).await;
    let services = services_with(
        &pool,
        Arc::new(SqliteLeadRepository::new(pool.clone())),
        Arc::new(StubDispatcher::succeeding("tok")),
    );

    let receipt = services
        .intake
        .submit(LeadSubmission {
            form_id: form.id,
            professional_id: Some(uuid::Uuid::new_v4()),
            data: LeadData::default(),
        })
        .await
        .unwrap();

    let lead = services.leads.require_lead(receipt.lead_id).await.unwrap();
    assert_eq!(lead.professional_id, form.professional_id);
}

#[tokio::test]
async fn test_deactivated_form_stops_accepting_submissions() {
    let pool = test_pool().await;
    let form = seed_form(&pool, true).await;
    let services = services_with(
        &pool,
        Arc::new(SqliteLeadRepository::new(pool.clone())),
        Arc::new(StubDispatcher::succeeding("tok")),
    );

    services.forms.deactivate(form.id).await.unwrap();
    let err = services
        .intake
        .submit(submission(form.id, LeadData::default()))
        .await
        .unwrap_err();
    assert!(matches!(err, IntakeError::FormNotFound(_)));

    services.forms.activate(form.id).await.unwrap();
    assert!(services
        .intake
        .submit(submission(form.id, LeadData::default()))
        .await
        .is_ok());
}
