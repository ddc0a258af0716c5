//! Application services for the intake pipeline and conversion workflow.

pub mod activity_service;
pub mod conversion_service;
pub mod follow_up_policy;
pub mod form_service;
pub mod intake_service;
pub mod lead_service;
pub mod scoring;

pub use activity_service::ActivityService;
pub use conversion_service::ConversionService;
pub use follow_up_policy::FollowUpPolicy;
pub use form_service::FormService;
pub use intake_service::{
    FollowUpOutcome, IntakeError, IntakeReceipt, IntakeService, LeadSubmission,
};
pub use lead_service::LeadService;
pub use scoring::{score_lead, LeadScorer};
