//! Implementation of the `leadflow serve` command.

use anyhow::{Context, Result};
use clap::Args;
use std::sync::Arc;

use super::open_services;
use crate::adapters::http::IntakeHttpServer;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Bind address (overrides server.host)
    #[arg(long)]
    pub host: Option<String>,

    /// Listen port (overrides server.port)
    #[arg(long, short)]
    pub port: Option<u16>,

    /// Disable the CORS layer
    #[arg(long)]
    pub no_cors: bool,
}

#[derive(Debug, serde::Serialize)]
pub struct ServeOutput {
    pub address: String,
    pub cors: bool,
    pub dispatcher_configured: bool,
}

impl CommandOutput for ServeOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![format!("Intake server listening on http://{}", self.address)];
        if !self.dispatcher_configured {
            lines.push("Invitation dispatcher not configured; invitations will return 503".to_string());
        }
        lines.push("Press Ctrl-C to stop".to_string());
        lines.join("\n")
    }
}

pub async fn execute(args: ServeArgs, mut config: Config, json_mode: bool) -> Result<()> {
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if args.no_cors {
        config.server.enable_cors = false;
    }

    let services = open_services(&config).await?;

    output(
        &ServeOutput {
            address: format!("{}:{}", config.server.host, config.server.port),
            cors: config.server.enable_cors,
            dispatcher_configured: config.dispatcher.endpoint_url().is_some(),
        },
        json_mode,
    );

    let server = IntakeHttpServer::new(Arc::new(services), config.server);
    server
        .serve_with_shutdown(shutdown_signal())
        .await
        .map_err(|err| anyhow::anyhow!(err))
        .context("Intake server failed")?;

    tracing::info!("Intake server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
    }
}
