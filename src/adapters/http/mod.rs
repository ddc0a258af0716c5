//! HTTP front door.

pub mod intake_http;

pub use intake_http::{build_router, ApiError, ErrorResponse, IntakeHttpServer};
