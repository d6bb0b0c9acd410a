// A complete incident reconstruction: narrative timeline, step script, static records and scene layout.
// Cross-checked once at construction so playback and lookups cannot fail later.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::scene::SceneLayout;
use crate::script::Script;
use crate::state::AnimationState;
use crate::timeline::{Timeline, TimelineEvent};
use crate::types::{PersonnelGroup, ScenarioId, StepIndex};

/// Condition of a piece of equipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentStatus {
    Operational,
    Degraded,
    Failed,
    Deployed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub status: EquipmentStatus,
    /// Remaining integrity, 0-100.
    pub integrity_pct: u8,
    pub last_inspection: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Personnel {
    pub id: String,
    pub name: String,
    pub role: String,
    pub group: PersonnelGroup,
}

/// Header metadata shown on the incident card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentMeta {
    pub reference: String,
    pub title: String,
    pub site: String,
    pub date: String,
    pub summary: String,
}

#[derive(Debug, Clone)]
pub struct Scenario {
    id: ScenarioId,
    meta: IncidentMeta,
    timeline: Timeline,
    script: Script,
    equipment: Vec<Equipment>,
    personnel: Vec<Personnel>,
    layout: SceneLayout,
}

impl Scenario {
    pub fn new(
        id: ScenarioId,
        meta: IncidentMeta,
        timeline: Timeline,
        script: Script,
        equipment: Vec<Equipment>,
        personnel: Vec<Personnel>,
        layout: SceneLayout,
    ) -> Result<Self, EngineError> {
        if script.len() != timeline.len() {
            return Err(EngineError::ScriptMismatch {
                steps: script.len(),
                events: timeline.len(),
            });
        }
        for (index, event) in timeline.events().iter().enumerate() {
            if let Some(id) = event
                .equipment
                .iter()
                .find(|id| !equipment.iter().any(|e| &e.id == *id))
            {
                return Err(EngineError::UnknownReference {
                    index,
                    kind: "equipment",
                    id: id.clone(),
                });
            }
            if let Some(id) = event
                .personnel
                .iter()
                .find(|id| !personnel.iter().any(|p| &p.id == *id))
            {
                return Err(EngineError::UnknownReference {
                    index,
                    kind: "personnel",
                    id: id.clone(),
                });
            }
        }
        Ok(Scenario {
            id,
            meta,
            timeline,
            script,
            equipment,
            personnel,
            layout,
        })
    }

    pub fn id(&self) -> ScenarioId {
        self.id
    }

    pub fn meta(&self) -> &IncidentMeta {
        &self.meta
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    pub fn equipment(&self) -> &[Equipment] {
        &self.equipment
    }

    pub fn personnel(&self) -> &[Personnel] {
        &self.personnel
    }

    pub fn layout(&self) -> &SceneLayout {
        &self.layout
    }

    pub fn initial_state(&self) -> AnimationState {
        AnimationState::initial(self.layout.vessel_start)
    }

    /// Deterministic state after step `index`, as a completed run would leave it.
    pub fn state_at(&self, index: StepIndex) -> Result<AnimationState, EngineError> {
        self.script.state_at(&self.initial_state(), index)
    }

    pub fn event(&self, index: StepIndex) -> Result<&TimelineEvent, EngineError> {
        self.timeline.get(index)
    }

    /// Equipment records referenced by the event at `index`, in reference order.
    pub fn equipment_for(&self, index: StepIndex) -> Result<Vec<&Equipment>, EngineError> {
        let event = self.timeline.get(index)?;
        Ok(event
            .equipment
            .iter()
            .filter_map(|id| self.equipment.iter().find(|e| &e.id == id))
            .collect())
    }

    /// Personnel records referenced by the event at `index`, in reference order.
    pub fn personnel_for(&self, index: StepIndex) -> Result<Vec<&Personnel>, EngineError> {
        let event = self.timeline.get(index)?;
        Ok(event
            .personnel
            .iter()
            .filter_map(|id| self.personnel.iter().find(|p| &p.id == id))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::ScriptStep;
    use crate::types::EventStatus;

    fn meta() -> IncidentMeta {
        IncidentMeta {
            reference: "INC-TEST".to_string(),
            title: "Test".to_string(),
            site: "Berth 1".to_string(),
            date: "2024-01-01".to_string(),
            summary: String::new(),
        }
    }

    fn pump() -> Equipment {
        Equipment {
            id: "EQ-1".to_string(),
            name: "Cargo pump".to_string(),
            kind: "pump".to_string(),
            status: EquipmentStatus::Operational,
            integrity_pct: 90,
            last_inspection: "2023-12-01".to_string(),
        }
    }

    fn timeline(equipment: &[&str]) -> Timeline {
        Timeline::new(vec![
            TimelineEvent::new(0, "09:00:00", "Start", "", EventStatus::Normal)
                .unwrap()
                .with_equipment(equipment),
            TimelineEvent::new(60, "09:01:00", "End", "", EventStatus::Recovery).unwrap(),
        ])
        .unwrap()
    }

    fn script(steps: usize) -> Script {
        Script::new((0..steps).map(|_| ScriptStep::new(300)).collect()).unwrap()
    }

    #[test]
    fn rejects_script_length_mismatch() {
        let err = Scenario::new(
            ScenarioId::JettyHoseFailure,
            meta(),
            timeline(&[]),
            script(3),
            vec![],
            vec![],
            SceneLayout::default(),
        )
        .unwrap_err();
        assert_eq!(err, EngineError::ScriptMismatch { steps: 3, events: 2 });
    }

    #[test]
    fn rejects_dangling_equipment_reference() {
        let err = Scenario::new(
            ScenarioId::JettyHoseFailure,
            meta(),
            timeline(&["EQ-404"]),
            script(2),
            vec![pump()],
            vec![],
            SceneLayout::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            EngineError::UnknownReference {
                index: 0,
                kind: "equipment",
                id: "EQ-404".to_string()
            }
        );
    }

    #[test]
    fn resolves_step_equipment() {
        let scenario = Scenario::new(
            ScenarioId::JettyHoseFailure,
            meta(),
            timeline(&["EQ-1"]),
            script(2),
            vec![pump()],
            vec![],
            SceneLayout::default(),
        )
        .unwrap();
        let found = scenario.equipment_for(StepIndex::new(0)).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Cargo pump");
        assert!(scenario.equipment_for(StepIndex::new(1)).unwrap().is_empty());
        assert!(scenario.equipment_for(StepIndex::new(2)).is_err());
    }
}
