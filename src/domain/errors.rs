//! Domain errors for the leadflow intake pipeline.

use thiserror::Error;
use uuid::Uuid;

use crate::domain::models::DispatchError;

/// Domain-level errors that can occur in the leadflow system.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Form not found or inactive: {0}")]
    FormNotFound(Uuid),

    #[error("Lead not found: {0}")]
    LeadNotFound(Uuid),

    #[error("Lead {0} has already been converted")]
    LeadAlreadyConverted(Uuid),

    #[error("Invalid state transition from {from} to {to}: {reason}")]
    InvalidStateTransition { from: String, to: String, reason: String },

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invitation dispatch failed: {0}")]
    Dispatch(#[from] DispatchError),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}
