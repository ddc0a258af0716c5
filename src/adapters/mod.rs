//! Infrastructure adapters for external systems.

pub mod dispatcher;
pub mod http;
pub mod sqlite;
pub mod wiring;

pub use wiring::Services;
