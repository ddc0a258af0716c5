use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Database path cannot be empty")]
    EmptyDatabasePath,

    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    #[error("Invalid server port: 0")]
    InvalidPort,

    #[error("Invalid dispatcher timeout: 0 seconds")]
    InvalidDispatcherTimeout,

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Project directory holding the database and config files
pub const CONFIG_DIR: &str = ".leadflow";

/// Prefix for environment overrides, e.g. `LEADFLOW_SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "LEADFLOW_";

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .leadflow/config.yaml (project config, created by init)
    /// 3. .leadflow/local.yaml (project local overrides, optional)
    /// 4. Environment variables (LEADFLOW_* prefix, `__` separates nested keys)
    pub fn load() -> Result<Config> {
        Self::load_from_dir(".")
    }

    /// Load configuration rooted at a project directory
    pub fn load_from_dir(root: impl AsRef<Path>) -> Result<Config> {
        let config_dir = root.as_ref().join(CONFIG_DIR);
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(config_dir.join("config.yaml")))
            .merge(Yaml::file(config_dir.join("local.yaml")))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// Environment variables still override the file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.database.path.trim().is_empty() {
            return Err(ConfigError::EmptyDatabasePath);
        }

        if config.database.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(
                config.database.max_connections,
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        if config.server.port == 0 {
            return Err(ConfigError::InvalidPort);
        }

        if config.server.host.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Server host cannot be empty".to_string(),
            ));
        }

        if config.dispatcher.timeout_secs == 0 {
            return Err(ConfigError::InvalidDispatcherTimeout);
        }

        if let Some(endpoint) = &config.dispatcher.endpoint {
            if !endpoint.is_empty()
                && !endpoint.starts_with("http://")
                && !endpoint.starts_with("https://")
            {
                return Err(ConfigError::ValidationFailed(format!(
                    "Dispatcher endpoint must be an http(s) URL: {endpoint}"
                )));
            }
        }

        Ok(())
    }
}
