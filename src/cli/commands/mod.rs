//! CLI command implementations.

pub mod form;
pub mod init;
pub mod lead;
pub mod serve;

use anyhow::{Context, Result};

use crate::adapters::dispatcher::dispatcher_from_config;
use crate::adapters::sqlite::initialize_database;
use crate::adapters::Services;
use crate::domain::models::Config;

/// Open the configured database and wire the service graph over it.
pub(crate) async fn open_services(config: &Config) -> Result<Services> {
    let pool = initialize_database(&config.database)
        .await
        .with_context(|| format!("Failed to open database at {}", config.database.path))?;
    let dispatcher =
        dispatcher_from_config(&config.dispatcher).context("Failed to configure invitation dispatcher")?;
    Ok(Services::sqlite(pool, dispatcher))
}
