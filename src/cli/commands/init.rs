//! Implementation of the `leadflow init` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::adapters::sqlite::initialize_database;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{Config, DatabaseConfig};
use crate::infrastructure::config::CONFIG_DIR;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing config.yaml
    #[arg(long, short)]
    pub force: bool,

    /// Target directory (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Debug, serde::Serialize)]
pub struct InitOutput {
    pub success: bool,
    pub message: String,
    pub initialized_path: PathBuf,
    pub directories_created: Vec<String>,
    pub config_written: bool,
    pub database_initialized: bool,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.message.clone()];
        if !self.directories_created.is_empty() {
            lines.push("\nCreated directories:".to_string());
            for dir in &self.directories_created {
                lines.push(format!("  - {dir}"));
            }
        }
        if self.config_written {
            lines.push(format!("\nWrote {CONFIG_DIR}/config.yaml"));
        }
        if self.database_initialized {
            lines.push("Database schema is up to date".to_string());
        }
        lines.join("\n")
    }
}

pub async fn execute(args: InitArgs, json_mode: bool) -> Result<()> {
    let target_path = if args.path.is_absolute() {
        args.path.clone()
    } else {
        std::env::current_dir()
            .context("Failed to get current directory")?
            .join(&args.path)
    };

    let config_dir = target_path.join(CONFIG_DIR);
    let config_file = config_dir.join("config.yaml");

    if config_file.exists() && !args.force {
        let output_data = InitOutput {
            success: false,
            message: "Project already initialized. Use --force to rewrite config.yaml.".to_string(),
            initialized_path: target_path,
            directories_created: vec![],
            config_written: false,
            database_initialized: false,
        };
        output(&output_data, json_mode);
        return Ok(());
    }

    let mut directories_created = vec![];
    for dir in [config_dir.clone(), config_dir.join("logs")] {
        if !dir.exists() {
            fs::create_dir_all(&dir)
                .await
                .with_context(|| format!("Failed to create {}", dir.display()))?;
            let relative = dir
                .strip_prefix(&target_path)
                .unwrap_or(&dir)
                .to_string_lossy()
                .to_string();
            directories_created.push(relative);
        }
    }

    let config = Config::default();
    let yaml = serde_yaml::to_string(&config).context("Failed to serialize default configuration")?;
    fs::write(&config_file, yaml)
        .await
        .with_context(|| format!("Failed to write {}", config_file.display()))?;

    let database = DatabaseConfig {
        path: resolve_database_path(&target_path, &config.database.path),
        ..config.database.clone()
    };
    let pool = initialize_database(&database)
        .await
        .context("Failed to initialize database")?;
    pool.close().await;

    let output_data = InitOutput {
        success: true,
        message: if args.force {
            "Project reinitialized successfully.".to_string()
        } else {
            "Project initialized successfully.".to_string()
        },
        initialized_path: target_path,
        directories_created,
        config_written: true,
        database_initialized: true,
    };

    output(&output_data, json_mode);
    Ok(())
}

/// Relative database paths are anchored at the project being initialized.
fn resolve_database_path(target: &Path, configured: &str) -> String {
    if configured.starts_with("sqlite:") || Path::new(configured).is_absolute() {
        configured.to_string()
    } else {
        target.join(configured).to_string_lossy().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_creates_config_and_database() {
        let dir = tempfile::tempdir().unwrap();
        let args = InitArgs {
            force: false,
            path: dir.path().to_path_buf(),
        };

        execute(args, true).await.unwrap();

        assert!(dir.path().join(".leadflow/config.yaml").exists());
        assert!(dir.path().join(".leadflow/leadflow.db").exists());

        let written = std::fs::read_to_string(dir.path().join(".leadflow/config.yaml")).unwrap();
        let parsed: Config = serde_yaml::from_str(&written).unwrap();
        assert_eq!(parsed.server.port, Config::default().server.port);
    }

    #[tokio::test]
    async fn test_init_twice_without_force_keeps_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_path_buf();
        execute(InitArgs { force: false, path: path.clone() }, true)
            .await
            .unwrap();

        let config_file = path.join(".leadflow/config.yaml");
        std::fs::write(&config_file, "server:\n  port: 9999\n").unwrap();

        execute(InitArgs { force: false, path }, true).await.unwrap();
        assert_eq!(
            std::fs::read_to_string(&config_file).unwrap(),
            "server:\n  port: 9999\n"
        );
    }

    #[test]
    fn test_resolve_database_path() {
        let target = Path::new("/srv/project");
        assert_eq!(
            resolve_database_path(target, ".leadflow/leadflow.db"),
            "/srv/project/.leadflow/leadflow.db"
        );
        assert_eq!(resolve_database_path(target, "/var/db/x.db"), "/var/db/x.db");
        assert_eq!(resolve_database_path(target, "sqlite::memory:"), "sqlite::memory:");
    }
}
