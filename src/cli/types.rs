//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::cli::commands::{form::FormArgs, init::InitArgs, lead::LeadArgs, serve::ServeArgs};

#[derive(Parser)]
#[command(name = "leadflow")]
#[command(about = "Leadflow - lead intake and follow-up pipeline", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Load configuration from this file instead of .leadflow/
    #[arg(short, long, global = true, env = "LEADFLOW_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize leadflow configuration and database
    Init(InitArgs),

    /// Run the intake HTTP server
    Serve(ServeArgs),

    /// Lead capture form management
    Form(FormArgs),

    /// Lead inspection and workflow commands
    Lead(LeadArgs),
}
