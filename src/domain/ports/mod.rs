//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that adapters must implement:
//! - LeadFormRepository: lead-capture form storage
//! - LeadRepository: leads, their follow-up tasks, and the transactional
//!   intake and conversion writes
//! - ActivityRepository: append-only lead activity log
//! - ClientProfileRepository: read access to converted clients
//! - InvitationDispatcher: outbound invitation notifier

pub mod activity_repository;
pub mod client_repository;
pub mod form_repository;
pub mod invitation_dispatcher;
pub mod lead_repository;

pub use activity_repository::ActivityRepository;
pub use client_repository::ClientProfileRepository;
pub use form_repository::{LeadFormFilter, LeadFormRepository};
pub use invitation_dispatcher::InvitationDispatcher;
pub use lead_repository::{LeadFilter, LeadRepository};
