//! Implementation of the `leadflow lead` commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde_json::json;
use uuid::Uuid;

use super::open_services;
use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::domain::models::{
    ActivityType, ClientProfile, Config, FollowUpTask, Lead, LeadActivity, LeadScore, LeadStatus,
};
use crate::domain::ports::LeadFilter;

#[derive(Args, Debug)]
pub struct LeadArgs {
    #[command(subcommand)]
    pub command: LeadCommands,
}

#[derive(Subcommand, Debug)]
pub enum LeadCommands {
    /// List leads, newest first
    List {
        /// Filter by status (new, contacted, converted)
        #[arg(long, value_parser = parse_status)]
        status: Option<LeadStatus>,

        /// Filter by score (hot, warm, cold)
        #[arg(long, value_parser = parse_score)]
        score: Option<LeadScore>,

        /// Filter by form
        #[arg(long)]
        form: Option<Uuid>,

        /// Filter by owning professional
        #[arg(long)]
        professional: Option<Uuid>,

        /// Maximum number of leads
        #[arg(long, default_value = "50")]
        limit: i64,
    },

    /// Show a lead with its follow-ups, activity and client profile
    Show { id: Uuid },

    /// Mark a new lead as contacted
    Contacted { id: Uuid },

    /// Attach a note to a lead's activity log
    Note { id: Uuid, text: String },

    /// Send a client-portal invitation to the lead's email
    Invite {
        id: Uuid,

        /// Custom message included in the invitation
        #[arg(long, short)]
        message: Option<String>,
    },

    /// Convert a lead into a client profile
    Convert {
        id: Uuid,

        /// User account the client profile belongs to
        #[arg(long)]
        user: Uuid,
    },

    /// List client profiles owned by a professional
    Clients {
        #[arg(long)]
        professional: Uuid,
    },
}

fn parse_status(s: &str) -> Result<LeadStatus, String> {
    LeadStatus::from_str(s).ok_or_else(|| format!("unknown status '{s}'"))
}

fn parse_score(s: &str) -> Result<LeadScore, String> {
    LeadScore::from_str(s).ok_or_else(|| format!("unknown score '{s}'"))
}

#[derive(Debug, serde::Serialize)]
pub struct LeadListOutput {
    pub leads: Vec<Lead>,
    pub total: usize,
}

impl CommandOutput for LeadListOutput {
    fn to_human(&self) -> String {
        if self.leads.is_empty() {
            return "No leads found.".to_string();
        }
        format!(
            "{}\n{} lead(s)",
            TableFormatter::new().format_leads(&self.leads),
            self.total
        )
    }
}

#[derive(Debug, serde::Serialize)]
pub struct LeadDetailOutput {
    pub lead: Lead,
    pub follow_ups: Vec<FollowUpTask>,
    pub activities: Vec<LeadActivity>,
    pub client: Option<ClientProfile>,
}

impl CommandOutput for LeadDetailOutput {
    fn to_human(&self) -> String {
        let lead = &self.lead;
        let mut lines = vec![
            format!("Lead {}", lead.id),
            format!("  Score:        {}", lead.score),
            format!("  Status:       {}", lead.status),
            format!("  Form:         {}", lead.form_id),
            format!("  Professional: {}", lead.professional_id),
            format!("  Created:      {}", lead.created_at.to_rfc3339()),
        ];
        if let Some(name) = lead.data.name() {
            lines.push(format!("  Name:         {name}"));
        }
        if let Some(email) = lead.data.email() {
            lines.push(format!("  Email:        {email}"));
        }
        if let Some(phone) = lead.data.phone() {
            lines.push(format!("  Phone:        {phone}"));
        }
        if let Some(message) = lead.data.message() {
            lines.push(format!("  Message:      {message}"));
        }

        let formatter = TableFormatter::new();
        if !self.follow_ups.is_empty() {
            lines.push(String::new());
            lines.push("Follow-ups:".to_string());
            lines.push(formatter.format_follow_ups(&self.follow_ups));
        }
        if !self.activities.is_empty() {
            lines.push(String::new());
            lines.push("Activity:".to_string());
            lines.push(formatter.format_activities(&self.activities));
        }
        if let Some(client) = &self.client {
            lines.push(String::new());
            lines.push(format!(
                "Converted to client {} (user {}) on {}",
                client.id,
                client
                    .user_id
                    .map_or_else(|| "-".to_string(), |u| u.to_string()),
                client.client_since.to_rfc3339()
            ));
        }
        lines.join("\n")
    }
}

#[derive(Debug, serde::Serialize)]
pub struct LeadStatusOutput {
    pub success: bool,
    pub lead_id: Uuid,
    pub status: LeadStatus,
}

impl CommandOutput for LeadStatusOutput {
    fn to_human(&self) -> String {
        format!("Lead {} is now {}", self.lead_id, self.status)
    }
}

#[derive(Debug, serde::Serialize)]
pub struct NoteOutput {
    pub activity: LeadActivity,
}

impl CommandOutput for NoteOutput {
    fn to_human(&self) -> String {
        format!("Note added to lead {}", self.activity.lead_id)
    }
}

#[derive(Debug, serde::Serialize)]
pub struct InvitationOutput {
    pub lead_id: Uuid,
    pub invitation_token: String,
}

impl CommandOutput for InvitationOutput {
    fn to_human(&self) -> String {
        format!(
            "Invitation sent for lead {} (token {})",
            self.lead_id, self.invitation_token
        )
    }
}

#[derive(Debug, serde::Serialize)]
pub struct ConversionOutput {
    pub success: bool,
    pub lead_id: Uuid,
    pub client_profile_id: Uuid,
}

impl CommandOutput for ConversionOutput {
    fn to_human(&self) -> String {
        format!(
            "Lead {} converted to client profile {}",
            self.lead_id, self.client_profile_id
        )
    }
}

#[derive(Debug, serde::Serialize)]
pub struct ClientListOutput {
    pub clients: Vec<ClientProfile>,
}

impl CommandOutput for ClientListOutput {
    fn to_human(&self) -> String {
        if self.clients.is_empty() {
            return "No clients found.".to_string();
        }
        self.clients
            .iter()
            .map(|c| {
                format!(
                    "{}  lead {}  since {}",
                    c.id,
                    c.original_lead_id,
                    c.client_since.format("%Y-%m-%d")
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub async fn execute(args: LeadArgs, config: &Config, json_mode: bool) -> Result<()> {
    let services = open_services(config).await?;

    match args.command {
        LeadCommands::List {
            status,
            score,
            form,
            professional,
            limit,
        } => {
            let filter = LeadFilter {
                form_id: form,
                professional_id: professional,
                status,
                score,
                limit: Some(limit),
            };
            let leads = services
                .leads
                .list_leads(filter)
                .await
                .context("Failed to list leads")?;
            let total = leads.len();
            output(&LeadListOutput { leads, total }, json_mode);
        }
        LeadCommands::Show { id } => {
            let lead = services.leads.require_lead(id).await?;
            let follow_ups = services.leads.follow_ups(id).await?;
            let activities = services.activity.list_for_lead(id).await?;
            let client = services.leads.client_for_lead(id).await?;
            output(
                &LeadDetailOutput {
                    lead,
                    follow_ups,
                    activities,
                    client,
                },
                json_mode,
            );
        }
        LeadCommands::Contacted { id } => {
            let lead = services
                .leads
                .mark_contacted(id)
                .await
                .context("Failed to mark lead contacted")?;
            output(
                &LeadStatusOutput {
                    success: true,
                    lead_id: lead.id,
                    status: lead.status,
                },
                json_mode,
            );
        }
        LeadCommands::Note { id, text } => {
            let lead = services.leads.require_lead(id).await?;
            let activity = services
                .activity
                .record(
                    lead.id,
                    lead.professional_id,
                    ActivityType::NoteAdded,
                    json!({ "source": "cli" }),
                    Some(text),
                )
                .await
                .context("Failed to record note")?;
            output(&NoteOutput { activity }, json_mode);
        }
        LeadCommands::Invite { id, message } => {
            let token = services
                .conversion
                .invite_lead(id, message)
                .await
                .context("Failed to send invitation")?;
            output(
                &InvitationOutput {
                    lead_id: id,
                    invitation_token: token.to_string(),
                },
                json_mode,
            );
        }
        LeadCommands::Convert { id, user } => {
            let profile = services
                .conversion
                .convert_lead_to_client(id, user)
                .await
                .context("Failed to convert lead")?;
            output(
                &ConversionOutput {
                    success: true,
                    lead_id: id,
                    client_profile_id: profile.id,
                },
                json_mode,
            );
        }
        LeadCommands::Clients { professional } => {
            let clients = services
                .leads
                .clients_for_professional(professional)
                .await
                .context("Failed to list clients")?;
            output(&ClientListOutput { clients }, json_mode);
        }
    }

    Ok(())
}
