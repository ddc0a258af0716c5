//! Leadflow - lead intake and follow-up pipeline
//!
//! Leadflow accepts public form submissions for a professional, scores each lead,
//! schedules a follow-up task, and carries the lead through contact, invitation
//! and conversion into a client profile.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Models, errors and port traits
//! - **Service Layer** (`services`): Intake pipeline and lead workflows
//! - **Adapters** (`adapters`): SQLite repositories, HTTP server, invitation dispatcher
//! - **Infrastructure Layer** (`infrastructure`): Configuration and logging
//! - **CLI Layer** (`cli`): Command-line interface

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use adapters::Services;
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    ClientProfile, Config, FollowUpPriority, FollowUpTask, Lead, LeadActivity, LeadData, LeadForm,
    LeadScore, LeadStatus,
};
pub use domain::ports::{
    ActivityRepository, ClientProfileRepository, InvitationDispatcher, LeadFilter,
    LeadFormRepository, LeadRepository,
};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{score_lead, IntakeService, LeadSubmission};
