// Incident register and search.
// Linear predicate filter over compiled-in mock data; results keep register order.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::types::ScenarioId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Open,
    UnderReview,
    Closed,
}

/// One row of the incident register.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub id: String,
    pub title: String,
    pub site: String,
    pub category: String,
    pub severity: Severity,
    pub status: ReportStatus,
    pub reported_on: String,
    /// Reconstruction available for this incident, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario: Option<ScenarioId>,
}

/// Search filters. Every provided field must match; empty query matches everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Case-insensitive substring over id, title, site and category.
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub severity: Option<Severity>,
    #[serde(default)]
    pub status: Option<ReportStatus>,
    /// Case-insensitive substring over site.
    #[serde(default)]
    pub site: Option<String>,
}

impl SearchQuery {
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        serde_json::from_str(json).map_err(|e| EngineError::InvalidConfig(e.to_string()))
    }

    pub fn matches(&self, incident: &Incident) -> bool {
        if let Some(text) = normalized(&self.text) {
            let hit = [
                &incident.id,
                &incident.title,
                &incident.site,
                &incident.category,
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(&text));
            if !hit {
                return false;
            }
        }
        if let Some(site) = normalized(&self.site) {
            if !incident.site.to_lowercase().contains(&site) {
                return false;
            }
        }
        if self.severity.is_some_and(|s| s != incident.severity) {
            return false;
        }
        if self.status.is_some_and(|s| s != incident.status) {
            return false;
        }
        true
    }
}

/// Blank filters count as absent.
fn normalized(filter: &Option<String>) -> Option<String> {
    filter
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

pub fn search<'a>(incidents: &'a [Incident], query: &SearchQuery) -> Vec<&'a Incident> {
    incidents.iter().filter(|i| query.matches(i)).collect()
}

#[allow(clippy::too_many_arguments)]
fn incident(
    id: &str,
    title: &str,
    site: &str,
    category: &str,
    severity: Severity,
    status: ReportStatus,
    reported_on: &str,
    scenario: Option<ScenarioId>,
) -> Incident {
    Incident {
        id: id.to_string(),
        title: title.to_string(),
        site: site.to_string(),
        category: category.to_string(),
        severity,
        status,
        reported_on: reported_on.to_string(),
        scenario,
    }
}

/// The mock incident register.
pub fn register() -> Vec<Incident> {
    vec![
        incident(
            "INC-2024-0117",
            "Quick-release coupling failure during crude discharge",
            "Marine Terminal, Jetty 3",
            "Loss of containment",
            Severity::Critical,
            ReportStatus::UnderReview,
            "2024-03-14",
            Some(ScenarioId::JettyHoseFailure),
        ),
        incident(
            "INC-2024-0142",
            "Forward spring line parted in squall",
            "Marine Terminal, Jetty 1",
            "Mooring failure",
            Severity::High,
            ReportStatus::Open,
            "2024-04-02",
            Some(ScenarioId::MooringLineParting),
        ),
        incident(
            "INC-2024-0098",
            "Tank 14 high-level alarm during receipt",
            "Tank Farm North",
            "Process safety",
            Severity::Medium,
            ReportStatus::Closed,
            "2024-02-21",
            None,
        ),
        incident(
            "INC-2024-0103",
            "Gasket weep on product manifold flange",
            "Marine Terminal, Jetty 3",
            "Loss of containment",
            Severity::Low,
            ReportStatus::Closed,
            "2024-02-27",
            None,
        ),
        incident(
            "INC-2024-0125",
            "Dropped object from loading arm platform",
            "Marine Terminal, Jetty 2",
            "Personal safety",
            Severity::High,
            ReportStatus::UnderReview,
            "2024-03-19",
            None,
        ),
        incident(
            "INC-2024-0131",
            "Vapour recovery unit trip on compressor vibration",
            "Vapour Recovery Unit",
            "Equipment failure",
            Severity::Medium,
            ReportStatus::Open,
            "2024-03-25",
            None,
        ),
        incident(
            "INC-2024-0136",
            "Pump seal failure on transfer pump P-207",
            "Tank Farm South",
            "Equipment failure",
            Severity::Medium,
            ReportStatus::Open,
            "2024-03-28",
            None,
        ),
        incident(
            "INC-2024-0150",
            "Contractor slip on wet gangway",
            "Marine Terminal, Jetty 1",
            "Personal safety",
            Severity::Low,
            ReportStatus::Closed,
            "2024-04-09",
            None,
        ),
    ]
}
