//! Implementation of the `leadflow form` commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use uuid::Uuid;

use super::open_services;
use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::domain::models::{Config, LeadForm};
use crate::domain::ports::LeadFormFilter;

#[derive(Args, Debug)]
pub struct FormArgs {
    #[command(subcommand)]
    pub command: FormCommands,
}

#[derive(Subcommand, Debug)]
pub enum FormCommands {
    /// Create a new, active lead capture form
    Create {
        /// Owning professional
        #[arg(long)]
        professional: Uuid,

        /// Display name
        #[arg(long)]
        name: String,
    },

    /// List forms
    List {
        /// Only forms owned by this professional
        #[arg(long)]
        professional: Option<Uuid>,

        /// Only active forms
        #[arg(long)]
        active: bool,
    },

    /// Show one form
    Show { id: Uuid },

    /// Start accepting submissions
    Activate { id: Uuid },

    /// Stop accepting submissions
    Deactivate { id: Uuid },
}

#[derive(Debug, serde::Serialize)]
pub struct FormOutput {
    pub form: LeadForm,
    #[serde(skip)]
    pub headline: &'static str,
}

impl CommandOutput for FormOutput {
    fn to_human(&self) -> String {
        let form = &self.form;
        [
            self.headline.to_string(),
            format!("  ID:           {}", form.id),
            format!("  Name:         {}", form.name),
            format!("  Professional: {}", form.professional_id),
            format!("  Active:       {}", if form.is_active { "yes" } else { "no" }),
            format!("  Created:      {}", form.created_at.to_rfc3339()),
        ]
        .join("\n")
    }
}

#[derive(Debug, serde::Serialize)]
pub struct FormListOutput {
    pub forms: Vec<LeadForm>,
    pub total: usize,
}

impl CommandOutput for FormListOutput {
    fn to_human(&self) -> String {
        if self.forms.is_empty() {
            return "No forms found.".to_string();
        }
        format!(
            "{}\n{} form(s)",
            TableFormatter::new().format_forms(&self.forms),
            self.total
        )
    }
}

pub async fn execute(args: FormArgs, config: &Config, json_mode: bool) -> Result<()> {
    let services = open_services(config).await?;
    let forms = &services.forms;

    match args.command {
        FormCommands::Create { professional, name } => {
            let form = forms
                .create_form(professional, name)
                .await
                .context("Failed to create form")?;
            output(&FormOutput { form, headline: "Form created" }, json_mode);
        }
        FormCommands::List { professional, active } => {
            let filter = LeadFormFilter {
                professional_id: professional,
                active_only: active,
            };
            let forms = forms.list_forms(filter).await.context("Failed to list forms")?;
            let total = forms.len();
            output(&FormListOutput { forms, total }, json_mode);
        }
        FormCommands::Show { id } => {
            let form = forms
                .get_form(id)
                .await
                .context("Failed to load form")?
                .ok_or_else(|| anyhow::anyhow!("Form not found: {id}"))?;
            output(&FormOutput { form, headline: "Form" }, json_mode);
        }
        FormCommands::Activate { id } => {
            let form = forms.activate(id).await.context("Failed to activate form")?;
            output(&FormOutput { form, headline: "Form activated" }, json_mode);
        }
        FormCommands::Deactivate { id } => {
            let form = forms.deactivate(id).await.context("Failed to deactivate form")?;
            output(&FormOutput { form, headline: "Form deactivated" }, json_mode);
        }
    }

    Ok(())
}
