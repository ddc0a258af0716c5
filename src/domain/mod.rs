//! Domain layer for the leadflow intake pipeline
//!
//! This module contains core business models, errors, and the port traits
//! that adapters implement.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
