// Scene primitives: pure functions from animation state to a renderable scene description.
// Rust decides what is where; JS only maps primitives onto meshes.
// The only time dependence is cosmetic (bobbing, blinking, particle drift).

use std::f32::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

use crate::state::AnimationState;
use crate::types::{PersonnelGroup, SceneSettings, StepIndex, Vec3};

const GOLDEN_ANGLE: f32 = 2.399_963;
const BOOM_SEGMENTS: usize = 12;
const COUPLING_GAP: f32 = 0.6;
const PARTICLE_SIZE: f32 = 0.3;

/// Fixed positions for a scenario's scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SceneLayout {
    pub vessel_start: Vec3,
    pub jetty_position: Vec3,
    pub jetty_length: f32,
    pub coupling_point: Vec3,
    pub spill_origin: Vec3,
    pub boom_stowed: Vec3,
    pub boom_radius: f32,
    pub warning_light: Vec3,
    pub personnel_posts: Vec<(PersonnelGroup, Vec3)>,
}

/// One renderable element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Primitive {
    Vessel {
        position: Vec3,
        roll_deg: f32,
    },
    Jetty {
        position: Vec3,
        length: f32,
    },
    Coupling {
        shore_side: Vec3,
        vessel_side: Vec3,
        broken: bool,
    },
    SpillParticle {
        position: Vec3,
        size: f32,
    },
    Boom {
        deployed: bool,
        segments: Vec<Vec3>,
    },
    WarningLight {
        position: Vec3,
        lit: bool,
    },
    PersonnelMarker {
        group: PersonnelGroup,
        position: Vec3,
        visible: bool,
    },
}

/// Everything JS needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneFrame {
    pub time_secs: f32,
    pub step: StepIndex,
    pub primitives: Vec<Primitive>,
}

impl SceneFrame {
    pub fn spill_particle_count(&self) -> usize {
        self.primitives
            .iter()
            .filter(|p| matches!(p, Primitive::SpillParticle { .. }))
            .count()
    }
}

/// Compose the scene for `state` at wall-clock `time_secs`.
pub fn compose_frame(
    state: &AnimationState,
    layout: &SceneLayout,
    settings: &SceneSettings,
    time_secs: f32,
) -> SceneFrame {
    let mut primitives = Vec::new();

    primitives.push(Primitive::Jetty {
        position: layout.jetty_position,
        length: layout.jetty_length,
    });
    primitives.push(vessel(state, settings, time_secs));
    primitives.push(coupling(state, layout));
    primitives.extend(spill_particles(state, layout, settings, time_secs));
    primitives.push(boom(state, layout));
    primitives.push(Primitive::WarningLight {
        position: layout.warning_light,
        lit: warning_lit(state.warning_active, settings.warning_blink_hz, time_secs),
    });

    for (group, position) in &layout.personnel_posts {
        primitives.push(Primitive::PersonnelMarker {
            group: *group,
            position: *position,
            visible: state.is_personnel_visible(*group),
        });
    }

    SceneFrame {
        time_secs,
        step: state.current_step,
        primitives,
    }
}

fn vessel(state: &AnimationState, settings: &SceneSettings, t: f32) -> Primitive {
    let phase = TAU * settings.bob_frequency_hz * t;
    let bob = Vec3::new(0.0, settings.bob_amplitude * phase.sin(), 0.0);
    Primitive::Vessel {
        position: state.vessel_position + bob,
        roll_deg: settings.roll_amplitude_deg * (phase + PI / 2.0).sin(),
    }
}

fn coupling(state: &AnimationState, layout: &SceneLayout) -> Primitive {
    let vessel_side = if state.coupling_broken {
        // Parted hose end droops towards the water.
        layout.coupling_point + Vec3::new(0.0, -0.4, COUPLING_GAP)
    } else {
        layout.coupling_point
    };
    Primitive::Coupling {
        shore_side: layout.coupling_point,
        vessel_side,
        broken: state.coupling_broken,
    }
}

fn spill_particles(
    state: &AnimationState,
    layout: &SceneLayout,
    settings: &SceneSettings,
    t: f32,
) -> Vec<Primitive> {
    let intensity = state.spill_intensity.value();
    let count = (intensity * settings.max_spill_particles as f32).round() as usize;
    if count == 0 {
        return Vec::new();
    }

    let radius = settings.spill_radius * intensity;
    (0..count)
        .map(|i| {
            let r = radius * ((i as f32 + 0.5) / count as f32).sqrt();
            let angle = i as f32 * GOLDEN_ANGLE + t * 0.1;
            let ripple = 0.02 * (t * 2.0 + i as f32).sin();
            Primitive::SpillParticle {
                position: layout.spill_origin + Vec3::new(r * angle.cos(), ripple, r * angle.sin()),
                size: PARTICLE_SIZE,
            }
        })
        .collect()
}

fn boom(state: &AnimationState, layout: &SceneLayout) -> Primitive {
    if !state.boom_deployed {
        return Primitive::Boom {
            deployed: false,
            segments: vec![layout.boom_stowed],
        };
    }

    // Half-ring on the seaward side of the spill.
    let segments = (0..=BOOM_SEGMENTS)
        .map(|i| {
            let angle = PI * i as f32 / BOOM_SEGMENTS as f32;
            layout.spill_origin
                + Vec3::new(layout.boom_radius * angle.cos(), 0.0, layout.boom_radius * angle.sin())
        })
        .collect();
    Primitive::Boom {
        deployed: true,
        segments,
    }
}

fn warning_lit(active: bool, blink_hz: f32, t: f32) -> bool {
    if !active {
        return false;
    }
    if blink_hz <= 0.0 {
        return true;
    }
    (t * blink_hz).rem_euclid(1.0) < 0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Intensity;

    fn layout() -> SceneLayout {
        SceneLayout {
            vessel_start: Vec3::new(-20.0, 0.0, 4.0),
            jetty_position: Vec3::new(0.0, 1.0, 0.0),
            jetty_length: 30.0,
            coupling_point: Vec3::new(-2.0, 1.5, 1.5),
            spill_origin: Vec3::new(-2.0, 0.0, 2.5),
            boom_stowed: Vec3::new(6.0, 1.2, -1.0),
            boom_radius: 7.0,
            warning_light: Vec3::new(1.0, 4.0, 0.0),
            personnel_posts: vec![
                (PersonnelGroup::TerminalOperators, Vec3::new(2.0, 1.2, -0.5)),
                (PersonnelGroup::BoomCrew, Vec3::new(6.0, 1.2, -1.5)),
            ],
        }
    }

    fn find<'a>(frame: &'a SceneFrame, pred: impl Fn(&Primitive) -> bool) -> &'a Primitive {
        frame.primitives.iter().find(|p| pred(p)).expect("primitive present")
    }

    #[test]
    fn quiet_scene_has_no_particles() {
        let state = AnimationState::initial(layout().vessel_start);
        let frame = compose_frame(&state, &layout(), &SceneSettings::default(), 0.0);
        assert_eq!(frame.spill_particle_count(), 0);
        assert!(matches!(
            find(&frame, |p| matches!(p, Primitive::Boom { .. })),
            Primitive::Boom { deployed: false, .. }
        ));
    }

    #[test]
    fn particle_count_scales_with_intensity() {
        let settings = SceneSettings::default();
        let mut state = AnimationState::initial(layout().vessel_start);
        state.spill_intensity = Intensity::new(0.3);
        let frame = compose_frame(&state, &layout(), &settings, 1.0);
        assert_eq!(frame.spill_particle_count(), 36);

        state.spill_intensity = Intensity::new(1.0);
        let frame = compose_frame(&state, &layout(), &settings, 1.0);
        assert_eq!(frame.spill_particle_count(), 120);
    }

    #[test]
    fn particles_stay_within_spill_radius() {
        let settings = SceneSettings::default();
        let mut state = AnimationState::initial(layout().vessel_start);
        state.spill_intensity = Intensity::new(0.5);
        let origin = layout().spill_origin;
        let frame = compose_frame(&state, &layout(), &settings, 3.7);
        for p in &frame.primitives {
            if let Primitive::SpillParticle { position, .. } = p {
                let dx = position.x - origin.x;
                let dz = position.z - origin.z;
                assert!((dx * dx + dz * dz).sqrt() <= settings.spill_radius * 0.5 + 1e-4);
            }
        }
    }

    #[test]
    fn vessel_bobs_around_state_position() {
        let settings = SceneSettings::default();
        let state = AnimationState::initial(Vec3::new(-4.0, 0.0, 3.5));
        for t in [0.0, 0.3, 1.1, 2.5] {
            let frame = compose_frame(&state, &layout(), &settings, t);
            if let Primitive::Vessel { position, .. } = find(&frame, |p| matches!(p, Primitive::Vessel { .. })) {
                assert_eq!(position.x, -4.0);
                assert!(position.y.abs() <= settings.bob_amplitude + 1e-6);
            }
        }
    }

    #[test]
    fn broken_coupling_separates_halves() {
        let mut state = AnimationState::initial(layout().vessel_start);
        state.coupling_broken = true;
        let frame = compose_frame(&state, &layout(), &SceneSettings::default(), 0.0);
        match find(&frame, |p| matches!(p, Primitive::Coupling { .. })) {
            Primitive::Coupling {
                shore_side,
                vessel_side,
                broken,
            } => {
                assert!(*broken);
                assert_ne!(shore_side, vessel_side);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn deployed_boom_rings_the_spill() {
        let mut state = AnimationState::initial(layout().vessel_start);
        state.boom_deployed = true;
        let frame = compose_frame(&state, &layout(), &SceneSettings::default(), 0.0);
        match find(&frame, |p| matches!(p, Primitive::Boom { .. })) {
            Primitive::Boom { deployed, segments } => {
                assert!(*deployed);
                assert_eq!(segments.len(), BOOM_SEGMENTS + 1);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn warning_light_blinks_only_when_active() {
        assert!(!warning_lit(false, 2.0, 0.1));
        assert!(warning_lit(true, 2.0, 0.1));
        assert!(!warning_lit(true, 2.0, 0.3));
        assert!(warning_lit(true, 0.0, 0.3));
    }

    #[test]
    fn personnel_markers_follow_visibility() {
        let mut state = AnimationState::initial(layout().vessel_start);
        state.personnel_visible.insert(PersonnelGroup::BoomCrew);
        let frame = compose_frame(&state, &layout(), &SceneSettings::default(), 0.0);
        let markers: Vec<_> = frame
            .primitives
            .iter()
            .filter_map(|p| match p {
                Primitive::PersonnelMarker { group, visible, .. } => Some((*group, *visible)),
                _ => None,
            })
            .collect();
        assert_eq!(
            markers,
            vec![
                (PersonnelGroup::TerminalOperators, false),
                (PersonnelGroup::BoomCrew, true)
            ]
        );
    }

    #[test]
    fn frame_serializes_with_type_tags() {
        let state = AnimationState::initial(layout().vessel_start);
        let frame = compose_frame(&state, &layout(), &SceneSettings::default(), 0.0);
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["primitives"][0]["type"], "jetty");
        assert_eq!(json["primitives"][1]["type"], "vessel");
    }
}
