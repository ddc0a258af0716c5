//! Lead domain model.
//!
//! A lead is a prospective-client record created from a form submission.
//! Its score is decided once at intake and never recomputed.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

/// Qualitative urgency classification of a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadScore {
    Cold,
    Warm,
    Hot,
}

impl LeadScore {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cold => "cold",
            Self::Warm => "warm",
            Self::Hot => "hot",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cold" => Some(Self::Cold),
            "warm" => Some(Self::Warm),
            "hot" => Some(Self::Hot),
            _ => None,
        }
    }
}

impl fmt::Display for LeadScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    /// Submitted, nobody has reached out yet
    New,
    /// A professional has made contact
    Contacted,
    /// Turned into a client profile
    Converted,
}

impl Default for LeadStatus {
    fn default() -> Self {
        Self::New
    }
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Contacted => "contacted",
            Self::Converted => "converted",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "new" => Some(Self::New),
            "contacted" => Some(Self::Contacted),
            "converted" => Some(Self::Converted),
            _ => None,
        }
    }

    /// Valid transitions from this status.
    pub fn valid_transitions(&self) -> Vec<LeadStatus> {
        match self {
            Self::New => vec![Self::Contacted, Self::Converted],
            Self::Contacted => vec![Self::Converted],
            Self::Converted => vec![],
        }
    }

    pub fn can_transition_to(&self, new_status: Self) -> bool {
        self.valid_transitions().contains(&new_status)
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Free-form field mapping submitted through a lead form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeadData(Map<String, Value>);

impl LeadData {
    pub const EMAIL: &'static str = "email";
    pub const PHONE: &'static str = "phone";
    pub const MESSAGE: &'static str = "message";
    pub const NAME: &'static str = "name";

    /// Builder-style insert, mostly useful for tests and the CLI.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Whether a field carries a usable value.
    ///
    /// Non-empty strings, non-zero numbers, `true`, arrays and objects count as present.
    pub fn has(&self, key: &str) -> bool {
        self.0.get(key).is_some_and(is_present)
    }

    /// String value of a field, if it is a non-empty string.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn email(&self) -> Option<&str> {
        self.text(Self::EMAIL)
    }

    pub fn phone(&self) -> Option<&str> {
        self.text(Self::PHONE)
    }

    pub fn message(&self) -> Option<&str> {
        self.text(Self::MESSAGE)
    }

    pub fn name(&self) -> Option<&str> {
        self.text(Self::NAME)
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// A prospective client captured through a lead form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: Uuid,
    pub form_id: Uuid,
    /// Owner of the form the lead was submitted through
    pub professional_id: Uuid,
    pub data: LeadData,
    pub score: LeadScore,
    pub status: LeadStatus,
    pub converted_to_user_id: Option<Uuid>,
    pub conversion_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Lead {
    /// Create a fresh lead in `new` status.
    ///
    /// Timestamps are truncated to microseconds, the precision they are stored with.
    pub fn new(form_id: Uuid, professional_id: Uuid, data: LeadData, score: LeadScore) -> Self {
        Self {
            id: Uuid::new_v4(),
            form_id,
            professional_id,
            data,
            score,
            status: LeadStatus::New,
            converted_to_user_id: None,
            conversion_date: None,
            created_at: Utc::now().trunc_subsecs(6),
        }
    }
}
