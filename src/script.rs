// Explicit step list consumed by the sequencer.
// One step per timeline event. Ramps are fixed-step linear interpolation, not physics.

use std::time::Duration;

use crate::error::EngineError;
use crate::state::AnimationState;
use crate::types::{Intensity, PersonnelGroup, StepIndex, Vec3};

pub const MIN_HOLD: Duration = Duration::from_millis(200);
pub const MAX_HOLD: Duration = Duration::from_millis(2500);

/// A single mutation applied by a step.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Interpolated when the step has a ramp.
    MoveVessel { to: Vec3 },
    BreakCoupling,
    /// Interpolated when the step has a ramp.
    SetSpill { to: Intensity },
    DeployBoom,
    SetWarning { active: bool },
    ShowPersonnel { group: PersonnelGroup },
    HidePersonnel { group: PersonnelGroup },
}

/// Sub-tick schedule for interpolated actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ramp {
    pub ticks: u32,
    pub tick: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScriptStep {
    actions: Vec<Action>,
    ramp: Option<Ramp>,
    hold: Duration,
}

impl ScriptStep {
    pub fn new(hold_ms: u64) -> Self {
        ScriptStep {
            actions: Vec::new(),
            ramp: None,
            hold: Duration::from_millis(hold_ms),
        }
    }

    pub fn then(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    pub fn ramp(mut self, ticks: u32, tick_ms: u64) -> Self {
        self.ramp = Some(Ramp {
            ticks,
            tick: Duration::from_millis(tick_ms),
        });
        self
    }

    pub fn hold(&self) -> Duration {
        self.hold
    }

    /// Number of commits this step makes. At least one.
    pub fn tick_count(&self) -> u32 {
        self.ramp.map(|r| r.ticks).unwrap_or(1)
    }

    /// Wait between consecutive sub-ticks, if the step ramps.
    pub fn tick_duration(&self) -> Option<Duration> {
        self.ramp.map(|r| r.tick)
    }

    /// State after sub-tick `tick` (1-based) of this step, starting from `from`.
    /// Instant actions land on the first sub-tick; ramped values reach their
    /// target exactly on the last.
    pub fn frame(&self, from: &AnimationState, index: StepIndex, tick: u32) -> AnimationState {
        let ticks = self.tick_count();
        let tick = tick.clamp(1, ticks);
        let fraction = tick as f32 / ticks as f32;
        let settled = tick >= ticks;

        let mut next = from.clone();
        next.current_step = index;
        for action in &self.actions {
            match action {
                Action::MoveVessel { to } => {
                    next.vessel_position = if settled {
                        *to
                    } else {
                        from.vessel_position.lerp(*to, fraction)
                    };
                }
                Action::SetSpill { to } => {
                    next.spill_intensity = if settled {
                        *to
                    } else {
                        from.spill_intensity.lerp(*to, fraction)
                    };
                }
                Action::BreakCoupling => next.coupling_broken = true,
                Action::DeployBoom => next.boom_deployed = true,
                Action::SetWarning { active } => next.warning_active = *active,
                Action::ShowPersonnel { group } => {
                    next.personnel_visible.insert(*group);
                }
                Action::HidePersonnel { group } => {
                    next.personnel_visible.remove(group);
                }
            }
        }
        next
    }

    /// State once every sub-tick of this step has been applied.
    pub fn settle(&self, from: &AnimationState, index: StepIndex) -> AnimationState {
        self.frame(from, index, self.tick_count())
    }

    fn validate(&self, index: usize) -> Result<(), EngineError> {
        if self.hold < MIN_HOLD || self.hold > MAX_HOLD {
            return Err(EngineError::InvalidHold {
                index,
                millis: self.hold.as_millis() as u64,
            });
        }
        if let Some(ramp) = self.ramp {
            if ramp.ticks == 0 {
                return Err(EngineError::InvalidRamp {
                    index,
                    message: "zero ticks".to_string(),
                });
            }
            if ramp.tick.is_zero() {
                return Err(EngineError::InvalidRamp {
                    index,
                    message: "zero tick duration".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Ordered steps, one per timeline event.
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    steps: Vec<ScriptStep>,
}

impl Script {
    pub fn new(steps: Vec<ScriptStep>) -> Result<Self, EngineError> {
        if steps.is_empty() {
            return Err(EngineError::EmptyTimeline);
        }
        for (index, step) in steps.iter().enumerate() {
            step.validate(index)?;
        }
        Ok(Script { steps })
    }

    pub fn steps(&self) -> &[ScriptStep] {
        &self.steps
    }

    pub(crate) fn len(&self) -> usize {
        self.steps.len()
    }

    /// Deterministic state after step `index` has fully settled.
    pub fn state_at(
        &self,
        initial: &AnimationState,
        index: StepIndex,
    ) -> Result<AnimationState, EngineError> {
        if index.as_usize() >= self.steps.len() {
            return Err(EngineError::StepOutOfRange {
                index: index.as_usize(),
                len: self.steps.len(),
            });
        }
        let mut state = initial.clone();
        for (i, step) in self.steps.iter().take(index.as_usize() + 1).enumerate() {
            state = step.settle(&state, StepIndex::new(i));
        }
        Ok(state)
    }

    /// Nominal playback length at 1x speed: every ramp plus every hold except the last.
    pub fn nominal_duration(&self) -> Duration {
        let last = self.steps.len().saturating_sub(1);
        self.steps
            .iter()
            .enumerate()
            .map(|(i, step)| {
                let ramp = step
                    .ramp
                    .map(|r| r.tick * r.ticks.saturating_sub(1))
                    .unwrap_or_default();
                if i < last {
                    ramp + step.hold
                } else {
                    ramp
                }
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn origin() -> AnimationState {
        AnimationState::initial(Vec3::new(0.0, 0.0, 0.0))
    }

    #[test]
    fn instant_actions_apply_on_first_tick() {
        let step = ScriptStep::new(500)
            .then(Action::BreakCoupling)
            .then(Action::SetWarning { active: true })
            .then(Action::ShowPersonnel {
                group: PersonnelGroup::EmergencyResponse,
            })
            .then(Action::SetSpill {
                to: Intensity::new(1.0),
            })
            .ramp(4, 100);

        let first = step.frame(&origin(), StepIndex::new(2), 1);
        assert!(first.coupling_broken);
        assert!(first.warning_active);
        assert!(first.is_personnel_visible(PersonnelGroup::EmergencyResponse));
        assert_eq!(first.current_step, StepIndex::new(2));
        assert!((first.spill_intensity.value() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn ramp_reaches_target_exactly() {
        let from = AnimationState {
            spill_intensity: Intensity::new(0.8),
            ..origin()
        };
        let step = ScriptStep::new(500)
            .then(Action::SetSpill {
                to: Intensity::new(0.3),
            })
            .then(Action::MoveVessel {
                to: Vec3::new(-4.0, 0.0, 3.5),
            })
            .ramp(7, 80);

        let settled = step.settle(&from, StepIndex::new(0));
        assert_eq!(settled.spill_intensity, Intensity::new(0.3));
        assert_eq!(settled.vessel_position, Vec3::new(-4.0, 0.0, 3.5));
    }

    #[test]
    fn unramped_step_applies_at_once() {
        let step = ScriptStep::new(300).then(Action::MoveVessel {
            to: Vec3::new(5.0, 0.0, 0.0),
        });
        assert_eq!(step.tick_count(), 1);
        assert_eq!(step.tick_duration(), None);
        let next = step.frame(&origin(), StepIndex::new(0), 1);
        assert_eq!(next.vessel_position.x, 5.0);
    }

    #[test]
    fn hide_personnel_removes_group() {
        let mut from = origin();
        from.personnel_visible.insert(PersonnelGroup::BoomCrew);
        let step = ScriptStep::new(300).then(Action::HidePersonnel {
            group: PersonnelGroup::BoomCrew,
        });
        assert!(step.settle(&from, StepIndex::new(0)).personnel_visible.is_empty());
    }

    #[test]
    fn rejects_hold_outside_bounds() {
        let err = Script::new(vec![ScriptStep::new(500), ScriptStep::new(100)]).unwrap_err();
        assert_eq!(err, EngineError::InvalidHold { index: 1, millis: 100 });
        let err = Script::new(vec![ScriptStep::new(2600)]).unwrap_err();
        assert_eq!(err, EngineError::InvalidHold { index: 0, millis: 2600 });
        assert!(Script::new(vec![ScriptStep::new(200), ScriptStep::new(2500)]).is_ok());
    }

    #[test]
    fn rejects_degenerate_ramps() {
        let err = Script::new(vec![ScriptStep::new(500).ramp(0, 100)]).unwrap_err();
        assert!(matches!(err, EngineError::InvalidRamp { index: 0, .. }));
        let err = Script::new(vec![ScriptStep::new(500).ramp(3, 0)]).unwrap_err();
        assert!(matches!(err, EngineError::InvalidRamp { index: 0, .. }));
    }

    #[test]
    fn state_at_folds_steps() {
        let script = Script::new(vec![
            ScriptStep::new(500).then(Action::SetWarning { active: true }),
            ScriptStep::new(500).then(Action::BreakCoupling),
            ScriptStep::new(500).then(Action::SetWarning { active: false }),
        ])
        .unwrap();

        let mid = script.state_at(&origin(), StepIndex::new(1)).unwrap();
        assert!(mid.warning_active && mid.coupling_broken);
        assert_eq!(mid.current_step, StepIndex::new(1));

        let end = script.state_at(&origin(), StepIndex::new(2)).unwrap();
        assert!(!end.warning_active && end.coupling_broken);

        assert!(matches!(
            script.state_at(&origin(), StepIndex::new(3)),
            Err(EngineError::StepOutOfRange { index: 3, len: 3 })
        ));
    }

    #[test]
    fn nominal_duration_skips_final_hold() {
        let script = Script::new(vec![
            ScriptStep::new(1000).ramp(5, 100),
            ScriptStep::new(500),
            ScriptStep::new(2000).ramp(3, 50),
        ])
        .unwrap();
        // (4 * 100 + 1000) + 500 + (2 * 50)
        assert_eq!(script.nominal_duration(), Duration::from_millis(2000));
    }

    proptest! {
        /// Ramped values stay between the endpoints and move monotonically.
        #[test]
        fn ramp_is_bounded_and_monotonic(
            from in 0.0f32..=1.0,
            to in 0.0f32..=1.0,
            ticks in 1u32..30,
        ) {
            let start = AnimationState { spill_intensity: Intensity::new(from), ..origin() };
            let step = ScriptStep::new(500)
                .then(Action::SetSpill { to: Intensity::new(to) })
                .ramp(ticks, 50);

            let (lo, hi) = if from <= to { (from, to) } else { (to, from) };
            let mut previous = from;
            for tick in 1..=ticks {
                let value = step.frame(&start, StepIndex::new(0), tick).spill_intensity.value();
                prop_assert!(value >= lo - 1e-6 && value <= hi + 1e-6);
                if from <= to {
                    prop_assert!(value >= previous - 1e-6);
                } else {
                    prop_assert!(value <= previous + 1e-6);
                }
                previous = value;
            }
            prop_assert_eq!(previous, Intensity::new(to).value());
        }
    }
}
