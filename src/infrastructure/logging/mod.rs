//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber:
//! - JSON or pretty console output
//! - Optional rolling JSON log files
//! - Contact masking for log fields

pub mod logger;

pub use logger::{mask_contact, LoggerImpl};
