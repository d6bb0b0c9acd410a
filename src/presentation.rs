// Presentation shell: what the incident cards, legends and detail panels display.
// Lookup and formatting only; nothing here mutates playback.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::scenario::{Equipment, Personnel, Scenario};
use crate::types::{EventStatus, StepIndex, WallTime};

pub fn status_label(status: EventStatus) -> &'static str {
    match status {
        EventStatus::Normal => "Normal Operations",
        EventStatus::Warning => "Warning",
        EventStatus::Critical => "Critical",
        EventStatus::Response => "Emergency Response",
        EventStatus::Mitigation => "Mitigation",
        EventStatus::Contained => "Contained",
        EventStatus::Reporting => "Reporting",
        EventStatus::Recovery => "Recovery",
    }
}

/// Badge colour as a CSS hex string.
pub fn status_color(status: EventStatus) -> &'static str {
    match status {
        EventStatus::Normal => "#22c55e",
        EventStatus::Warning => "#eab308",
        EventStatus::Critical => "#ef4444",
        EventStatus::Response => "#f97316",
        EventStatus::Mitigation => "#3b82f6",
        EventStatus::Contained => "#06b6d4",
        EventStatus::Reporting => "#a855f7",
        EventStatus::Recovery => "#10b981",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub status: EventStatus,
    pub label: &'static str,
    pub color: &'static str,
}

pub fn status_legend() -> Vec<LegendEntry> {
    EventStatus::ALL
        .iter()
        .map(|status| LegendEntry {
            status: *status,
            label: status_label(*status),
            color: status_color(*status),
        })
        .collect()
}

/// "+HH:MM:SS" offset from the first event.
pub fn format_elapsed(secs: u32) -> String {
    format!("+{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// Compact span such as "4h 35m" or "12m".
pub fn format_span(secs: u32) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    match (hours, minutes) {
        (0, 0) => format!("{}s", secs),
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}

/// The current-step card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepView {
    pub index: StepIndex,
    pub total: usize,
    pub heading: String,
    pub label: String,
    pub timestamp: WallTime,
    pub elapsed: String,
    pub description: String,
    pub status: EventStatus,
    pub status_label: &'static str,
    pub status_color: &'static str,
    pub progress_pct: u8,
    pub spill_volume: Option<String>,
    pub recovered_volume: Option<String>,
}

pub fn step_view(scenario: &Scenario, index: StepIndex) -> Result<StepView, EngineError> {
    let timeline = scenario.timeline();
    let event = timeline.get(index)?;
    let first = timeline.events()[0].time;
    let total = timeline.len();
    let progress_pct = if total <= 1 {
        100
    } else {
        (index.as_usize() * 100 / (total - 1)) as u8
    };

    Ok(StepView {
        index,
        total,
        heading: format!("Step {} of {}", index.ordinal(), total),
        label: event.label.clone(),
        timestamp: event.timestamp,
        elapsed: format_elapsed(event.time - first),
        description: event.description.clone(),
        status: event.status,
        status_label: status_label(event.status),
        status_color: status_color(event.status),
        progress_pct,
        spill_volume: timeline.spill_volume_at(index).map(str::to_string),
        recovered_volume: timeline.recovered_volume_at(index).map(str::to_string),
    })
}

/// One line of the full timeline panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineRow {
    pub index: StepIndex,
    pub timestamp: WallTime,
    pub label: String,
    pub status: EventStatus,
    pub status_color: &'static str,
    pub completed: bool,
    pub active: bool,
}

pub fn timeline_rows(scenario: &Scenario, current: StepIndex) -> Vec<TimelineRow> {
    scenario
        .timeline()
        .events()
        .iter()
        .enumerate()
        .map(|(i, event)| TimelineRow {
            index: StepIndex::new(i),
            timestamp: event.timestamp,
            label: event.label.clone(),
            status: event.status,
            status_color: status_color(event.status),
            completed: i < current.as_usize(),
            active: i == current.as_usize(),
        })
        .collect()
}

/// Header card for the incident being replayed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncidentSummary {
    pub reference: String,
    pub title: String,
    pub site: String,
    pub date: String,
    pub summary: String,
    pub steps: usize,
    pub span: String,
    pub current_status: EventStatus,
    pub spill_volume: Option<String>,
    pub recovered_volume: Option<String>,
}

pub fn incident_summary(scenario: &Scenario, current: StepIndex) -> Result<IncidentSummary, EngineError> {
    let timeline = scenario.timeline();
    let event = timeline.get(current)?;
    let meta = scenario.meta();
    Ok(IncidentSummary {
        reference: meta.reference.clone(),
        title: meta.title.clone(),
        site: meta.site.clone(),
        date: meta.date.clone(),
        summary: meta.summary.clone(),
        steps: timeline.len(),
        span: format_span(timeline.span_secs()),
        current_status: event.status,
        spill_volume: timeline.spill_volume_at(current).map(str::to_string),
        recovered_volume: timeline.recovered_volume_at(current).map(str::to_string),
    })
}

/// Collapsible detail panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelKind {
    Equipment,
    Personnel,
    Timeline,
}

impl FromStr for PanelKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "equipment" => Ok(PanelKind::Equipment),
            "personnel" => Ok(PanelKind::Personnel),
            "timeline" => Ok(PanelKind::Timeline),
            _ => Err(EngineError::UnknownPanel(s.to_string())),
        }
    }
}

/// Which panels are open. All collapsed by default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelState {
    expanded: BTreeSet<PanelKind>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelFlags {
    pub equipment: bool,
    pub personnel: bool,
    pub timeline: bool,
}

impl PanelState {
    /// Flip a panel; returns whether it is now expanded.
    pub fn toggle(&mut self, panel: PanelKind) -> bool {
        if self.expanded.remove(&panel) {
            false
        } else {
            self.expanded.insert(panel);
            true
        }
    }

    pub fn is_expanded(&self, panel: PanelKind) -> bool {
        self.expanded.contains(&panel)
    }

    pub fn flags(&self) -> PanelFlags {
        PanelFlags {
            equipment: self.is_expanded(PanelKind::Equipment),
            personnel: self.is_expanded(PanelKind::Personnel),
            timeline: self.is_expanded(PanelKind::Timeline),
        }
    }
}

/// Contents of the expanded panels for the current step. Collapsed panels are `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelDetails {
    pub equipment: Option<Vec<Equipment>>,
    pub personnel: Option<Vec<Personnel>>,
    pub timeline: Option<Vec<TimelineRow>>,
}

pub fn panel_details(
    scenario: &Scenario,
    panels: &PanelState,
    current: StepIndex,
) -> Result<PanelDetails, EngineError> {
    let equipment = if panels.is_expanded(PanelKind::Equipment) {
        Some(scenario.equipment_for(current)?.into_iter().cloned().collect())
    } else {
        None
    };
    let personnel = if panels.is_expanded(PanelKind::Personnel) {
        Some(scenario.personnel_for(current)?.into_iter().cloned().collect())
    } else {
        None
    };
    let timeline = panels
        .is_expanded(PanelKind::Timeline)
        .then(|| timeline_rows(scenario, current));

    Ok(PanelDetails {
        equipment,
        personnel,
        timeline,
    })
}
