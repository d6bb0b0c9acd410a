// Visual state driven by the sequencer.
// Every field lives in one value; commits replace it whole so readers never see a half-applied step.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::{Intensity, PersonnelGroup, StepIndex, Vec3};

/// Everything the scene and the presentation shell read from playback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationState {
    pub current_step: StepIndex,
    pub vessel_position: Vec3,
    pub coupling_broken: bool,
    pub spill_intensity: Intensity,
    pub boom_deployed: bool,
    pub warning_active: bool,
    pub personnel_visible: BTreeSet<PersonnelGroup>,
}

impl AnimationState {
    /// Initial values: step 0, vessel at `vessel_start`, everything else off.
    pub fn initial(vessel_start: Vec3) -> Self {
        AnimationState {
            current_step: StepIndex::new(0),
            vessel_position: vessel_start,
            coupling_broken: false,
            spill_intensity: Intensity::ZERO,
            boom_deployed: false,
            warning_active: false,
            personnel_visible: BTreeSet::new(),
        }
    }

    pub fn is_personnel_visible(&self, group: PersonnelGroup) -> bool {
        self.personnel_visible.contains(&group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_is_quiet() {
        let state = AnimationState::initial(Vec3::new(-20.0, 0.0, 4.0));
        assert_eq!(state.current_step, StepIndex::new(0));
        assert_eq!(state.vessel_position, Vec3::new(-20.0, 0.0, 4.0));
        assert!(!state.coupling_broken);
        assert!(!state.boom_deployed);
        assert!(!state.warning_active);
        assert_eq!(state.spill_intensity, Intensity::ZERO);
        assert!(state.personnel_visible.is_empty());
    }

    #[test]
    fn serializes_personnel_as_list() {
        let mut state = AnimationState::initial(Vec3::default());
        state.personnel_visible.insert(PersonnelGroup::BoomCrew);
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["personnel_visible"], serde_json::json!(["boom_crew"]));
        assert_eq!(json["current_step"], serde_json::json!(0));
    }
}
