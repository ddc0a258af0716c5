//! Domain models for the leadflow intake pipeline.

pub mod activity;
pub mod client;
pub mod config;
pub mod follow_up;
pub mod form;
pub mod invitation;
pub mod lead;

pub use activity::{ActivityType, LeadActivity};
pub use client::ClientProfile;
pub use config::{
    Config, DatabaseConfig, DispatcherConfig, LogFormat, LoggingConfig, RotationPolicy,
    ServerConfig,
};
pub use follow_up::{FollowUpPriority, FollowUpTask};
pub use form::LeadForm;
pub use invitation::{DispatchError, InvitationRequest, InvitationToken};
pub use lead::{Lead, LeadData, LeadScore, LeadStatus};
