// Timeline events for an incident reconstruction.
// Insertion order is chronological order. Validated once at construction, immutable afterwards.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::types::{EventStatus, StepIndex, WallTime};

/// One moment in the scripted incident narrative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// Offset from the first event, in seconds.
    pub time: u32,
    pub timestamp: WallTime,
    pub label: String,
    pub description: String,
    pub status: EventStatus,
    #[serde(default)]
    pub equipment: Vec<String>,
    #[serde(default)]
    pub personnel: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spill_volume: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovered_volume: Option<String>,
}

impl TimelineEvent {
    pub fn new(
        time: u32,
        timestamp: &str,
        label: &str,
        description: &str,
        status: EventStatus,
    ) -> Result<Self, EngineError> {
        Ok(TimelineEvent {
            time,
            timestamp: WallTime::parse(timestamp)?,
            label: label.to_string(),
            description: description.to_string(),
            status,
            equipment: Vec::new(),
            personnel: Vec::new(),
            spill_volume: None,
            recovered_volume: None,
        })
    }

    pub fn with_equipment(mut self, ids: &[&str]) -> Self {
        self.equipment = ids.iter().map(|id| id.to_string()).collect();
        self
    }

    pub fn with_personnel(mut self, ids: &[&str]) -> Self {
        self.personnel = ids.iter().map(|id| id.to_string()).collect();
        self
    }

    pub fn with_spill_volume(mut self, volume: &str) -> Self {
        self.spill_volume = Some(volume.to_string());
        self
    }

    pub fn with_recovered_volume(mut self, volume: &str) -> Self {
        self.recovered_volume = Some(volume.to_string());
        self
    }
}

/// Non-empty, chronologically ordered list of events.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Timeline {
    events: Vec<TimelineEvent>,
}

impl Timeline {
    pub fn new(events: Vec<TimelineEvent>) -> Result<Self, EngineError> {
        if events.is_empty() {
            return Err(EngineError::EmptyTimeline);
        }
        for (index, pair) in events.windows(2).enumerate() {
            if pair[1].time < pair[0].time {
                return Err(EngineError::OutOfOrder {
                    index: index + 1,
                    time: pair[1].time,
                    previous: pair[0].time,
                });
            }
        }
        Ok(Timeline { events })
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    pub fn last_index(&self) -> StepIndex {
        StepIndex::new(self.events.len() - 1)
    }

    pub fn get(&self, index: StepIndex) -> Result<&TimelineEvent, EngineError> {
        self.events
            .get(index.as_usize())
            .ok_or(EngineError::StepOutOfRange {
                index: index.as_usize(),
                len: self.events.len(),
            })
    }

    /// Total narrative span in seconds.
    pub fn span_secs(&self) -> u32 {
        let first = self.events.first().map(|e| e.time).unwrap_or(0);
        let last = self.events.last().map(|e| e.time).unwrap_or(0);
        last - first
    }

    /// Latest spill volume reported at or before `index`.
    pub fn spill_volume_at(&self, index: StepIndex) -> Option<&str> {
        self.events
            .iter()
            .take(index.as_usize() + 1)
            .rev()
            .find_map(|e| e.spill_volume.as_deref())
    }

    /// Latest recovered volume reported at or before `index`.
    pub fn recovered_volume_at(&self, index: StepIndex) -> Option<&str> {
        self.events
            .iter()
            .take(index.as_usize() + 1)
            .rev()
            .find_map(|e| e.recovered_volume.as_deref())
    }
}

impl<'de> Deserialize<'de> for Timeline {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let events = Vec::<TimelineEvent>::deserialize(deserializer)?;
        Timeline::new(events).map_err(serde::de::Error::custom)
    }
}
