use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::severity::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    Operational,
    Degraded,
    Major,
    Investigating,
}

impl ProbeStatus {
    /// Maps a live probe status onto the status log's id scheme.
    pub fn status_id(self) -> i64 {
        match self {
            ProbeStatus::Operational => 1,
            ProbeStatus::Degraded => 2,
            ProbeStatus::Major => 4,
            ProbeStatus::Investigating => 6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResult {
    pub status: ProbeStatus,
    pub response_time_ms: Option<f64>,
    pub observed_at: DateTime<Utc>,
}

// The status log document keeps the key names its curators already write,
// so it round-trips unchanged through the raw data endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusLog {
    #[serde(rename = "ShowStatuses")]
    pub show_statuses: bool,
    #[serde(rename = "StatusCategories")]
    pub categories: Vec<StatusCategory>,
    #[serde(rename = "StatusTypes")]
    pub status_types: Vec<StatusType>,
    #[serde(rename = "CurrentStatuses")]
    pub current: Vec<IncidentRecord>,
    #[serde(rename = "PastIncidents")]
    pub past: Vec<IncidentRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusCategory {
    #[serde(rename = "CategoryID")]
    pub id: i64,
    #[serde(rename = "CategoryName")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusType {
    #[serde(rename = "StatusID")]
    pub id: i64,
    #[serde(rename = "Status")]
    pub name: String,
}

/// One curated incident. A missing `fixed_at` marks it as still ongoing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IncidentRecord {
    #[serde(rename = "StatusTitle")]
    pub title: String,
    #[serde(rename = "StatusDescription")]
    pub description: String,
    #[serde(rename = "By")]
    pub author: String,
    #[serde(rename = "StatusID")]
    pub status_ids: Vec<i64>,
    #[serde(rename = "CategoryID")]
    pub category_ids: Vec<i64>,
    #[serde(rename = "StartedAt")]
    pub started_at: Option<i64>,
    #[serde(rename = "FixedAt")]
    pub fixed_at: Option<i64>,
}

/// Resolved status for one calendar day of the history.
#[derive(Debug, Clone, Serialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub severity: Severity,
    pub incidents: Vec<IncidentSummary>,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct IncidentSummary {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: Severity,
    pub description: String,
    pub by: String,
    pub started_at: i64,
    pub fixed_at: Option<i64>,
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
