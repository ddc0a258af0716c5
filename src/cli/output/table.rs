//! Table output formatting for CLI commands
//!
//! Renders forms, leads, follow-up tasks and activities with comfy-table.

use chrono::Utc;
use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use std::env;

use crate::cli::output::truncate;
use crate::domain::models::{
    FollowUpPriority, FollowUpTask, Lead, LeadActivity, LeadForm, LeadScore, LeadStatus,
};

/// Table formatter for CLI output
pub struct TableFormatter {
    use_colors: bool,
    max_width: Option<u16>,
}

impl TableFormatter {
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
            max_width: None,
        }
    }

    pub fn with_config(use_colors: bool, max_width: Option<u16>) -> Self {
        Self {
            use_colors,
            max_width,
        }
    }

    pub fn format_forms(&self, forms: &[LeadForm]) -> String {
        let mut table = self.create_base_table();
        table.set_header(header(&["ID", "Name", "Professional", "Active", "Created"]));

        for form in forms {
            let active = if form.is_active { "yes" } else { "no" };
            let active_cell = if self.use_colors {
                Cell::new(active).fg(if form.is_active { Color::Green } else { Color::DarkGrey })
            } else {
                Cell::new(active)
            };

            table.add_row(vec![
                Cell::new(form.id),
                Cell::new(truncate(&form.name, 30)),
                Cell::new(short_id(&form.professional_id.to_string())),
                active_cell,
                Cell::new(form.created_at.format("%Y-%m-%d %H:%M")),
            ]);
        }

        table.to_string()
    }

    pub fn format_leads(&self, leads: &[Lead]) -> String {
        let mut table = self.create_base_table();
        table.set_header(header(&["ID", "Score", "Status", "Name", "Email", "Created"]));

        for lead in leads {
            let score_cell = if self.use_colors {
                Cell::new(lead.score).fg(score_color(lead.score))
            } else {
                Cell::new(lead.score)
            };
            let status_cell = if self.use_colors {
                Cell::new(lead.status).fg(status_color(lead.status))
            } else {
                Cell::new(lead.status)
            };

            table.add_row(vec![
                Cell::new(lead.id),
                score_cell,
                status_cell,
                Cell::new(truncate(lead.data.name().unwrap_or("-"), 24)),
                Cell::new(truncate(lead.data.email().unwrap_or("-"), 30)),
                Cell::new(lead.created_at.format("%Y-%m-%d %H:%M")),
            ]);
        }

        table.to_string()
    }

    pub fn format_follow_ups(&self, tasks: &[FollowUpTask]) -> String {
        let now = Utc::now();
        let mut table = self.create_base_table();
        table.set_header(header(&["Priority", "Title", "Due"]));

        for task in tasks {
            let priority_cell = if self.use_colors {
                Cell::new(task.priority).fg(priority_color(task.priority))
            } else {
                Cell::new(task.priority)
            };

            let due = task.due_date.format("%Y-%m-%d %H:%M").to_string();
            let due_cell = if task.is_overdue(now) {
                let cell = Cell::new(format!("{due} (overdue)"));
                if self.use_colors {
                    cell.fg(Color::Red).add_attribute(Attribute::Bold)
                } else {
                    cell
                }
            } else {
                Cell::new(due)
            };

            table.add_row(vec![priority_cell, Cell::new(truncate(&task.title, 50)), due_cell]);
        }

        table.to_string()
    }

    pub fn format_activities(&self, activities: &[LeadActivity]) -> String {
        let mut table = self.create_base_table();
        table.set_header(header(&["When", "Type", "Notes"]));

        for activity in activities {
            table.add_row(vec![
                Cell::new(activity.created_at.format("%Y-%m-%d %H:%M")),
                Cell::new(activity.activity_type),
                Cell::new(truncate(activity.notes.as_deref().unwrap_or("-"), 60)),
            ]);
        }

        table.to_string()
    }

    fn create_base_table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        if let Some(width) = self.max_width {
            table.set_width(width);
        }

        table
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn header(columns: &[&str]) -> Vec<Cell> {
    columns
        .iter()
        .map(|c| Cell::new(c).add_attribute(Attribute::Bold))
        .collect()
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

fn supports_color() -> bool {
    if env::var("NO_COLOR").is_ok() {
        return false;
    }

    if let Ok(term) = env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    true
}

fn score_color(score: LeadScore) -> Color {
    match score {
        LeadScore::Hot => Color::Red,
        LeadScore::Warm => Color::Yellow,
        LeadScore::Cold => Color::Blue,
    }
}

fn status_color(status: LeadStatus) -> Color {
    match status {
        LeadStatus::New => Color::Cyan,
        LeadStatus::Contacted => Color::Yellow,
        LeadStatus::Converted => Color::Green,
    }
}

fn priority_color(priority: FollowUpPriority) -> Color {
    match priority {
        FollowUpPriority::Urgent => Color::Red,
        FollowUpPriority::High => Color::Yellow,
        FollowUpPriority::Medium => Color::White,
    }
}
