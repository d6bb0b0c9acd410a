// Strong typing over strings. Newtypes for step indices, wall-clock times, and 0-1 intensities.
// Config structs carry serde defaults so JS can pass partial JSON.

use std::fmt;
use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Index into a timeline. Newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct StepIndex(usize);

impl StepIndex {
    pub fn new(index: usize) -> Self {
        StepIndex(index)
    }

    pub fn as_usize(&self) -> usize {
        self.0
    }

    /// One-based position for display ("Step 3 of 9").
    pub fn ordinal(&self) -> usize {
        self.0 + 1
    }
}

/// Wall-clock time of day as shown on the incident log (HH:MM:SS).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WallTime {
    hours: u8,
    minutes: u8,
    seconds: u8,
}

impl WallTime {
    pub fn new(hours: u8, minutes: u8, seconds: u8) -> Result<Self, EngineError> {
        if hours > 23 || minutes > 59 || seconds > 59 {
            return Err(EngineError::InvalidTimestamp(format!(
                "{:02}:{:02}:{:02}",
                hours, minutes, seconds
            )));
        }
        Ok(WallTime {
            hours,
            minutes,
            seconds,
        })
    }

    pub fn parse(text: &str) -> Result<Self, EngineError> {
        let invalid = || EngineError::InvalidTimestamp(text.to_string());
        let mut parts = text.split(':');
        let mut field = || -> Result<u8, EngineError> {
            let part = parts.next().ok_or_else(invalid)?;
            if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            part.parse().map_err(|_| invalid())
        };
        let (hours, minutes, seconds) = (field()?, field()?, field()?);
        if parts.next().is_some() {
            return Err(invalid());
        }
        WallTime::new(hours, minutes, seconds).map_err(|_| invalid())
    }
}

impl fmt::Display for WallTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

impl TryFrom<String> for WallTime {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        WallTime::parse(&value)
    }
}

impl From<WallTime> for String {
    fn from(value: WallTime) -> Self {
        value.to_string()
    }
}

/// Scene-space position (metres, y up).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Vec3 { x, y, z }
    }

    pub fn lerp(self, to: Vec3, t: f32) -> Vec3 {
        self + (to - self) * t
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// Scalar intensity clamped to 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, Default)]
#[serde(from = "f32", into = "f32")]
pub struct Intensity(f32);

impl Intensity {
    pub const ZERO: Intensity = Intensity(0.0);

    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Intensity::ZERO;
        }
        Intensity(value.clamp(0.0, 1.0))
    }

    pub fn value(&self) -> f32 {
        self.0
    }

    pub fn lerp(self, to: Intensity, t: f32) -> Intensity {
        Intensity::new(self.0 + (to.0 - self.0) * t)
    }
}

impl From<f32> for Intensity {
    fn from(value: f32) -> Self {
        Intensity::new(value)
    }
}

impl From<Intensity> for f32 {
    fn from(intensity: Intensity) -> Self {
        intensity.0
    }
}

/// Severity tag on a timeline event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Normal,
    Warning,
    Critical,
    Response,
    Mitigation,
    Contained,
    Reporting,
    Recovery,
}

impl EventStatus {
    pub const ALL: [EventStatus; 8] = [
        EventStatus::Normal,
        EventStatus::Warning,
        EventStatus::Critical,
        EventStatus::Response,
        EventStatus::Mitigation,
        EventStatus::Contained,
        EventStatus::Reporting,
        EventStatus::Recovery,
    ];
}

/// Crew groups that appear as markers in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonnelGroup {
    TerminalOperators,
    MooringCrew,
    EmergencyResponse,
    BoomCrew,
    RecoveryCrew,
}

/// Built-in incident reconstructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioId {
    #[default]
    JettyHoseFailure,
    MooringLineParting,
}

impl ScenarioId {
    pub const ALL: [ScenarioId; 2] = [ScenarioId::JettyHoseFailure, ScenarioId::MooringLineParting];
}

/// Engine configuration passed from JS.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub scenario: ScenarioId,
    #[serde(default)]
    pub playback: PlaybackSettings,
    #[serde(default)]
    pub scene: SceneSettings,
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        serde_json::from_str(json).map_err(|e| EngineError::InvalidConfig(e.to_string()))
    }
}

/// Sequencer timing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackSettings {
    /// Playback rate multiplier. Every wait is divided by this (0.25 to 4.0).
    #[serde(default = "default_speed")]
    pub speed: f32,
}

impl PlaybackSettings {
    pub fn clamped_speed(&self) -> f32 {
        if self.speed.is_nan() {
            return 1.0;
        }
        self.speed.clamp(0.25, 4.0)
    }
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        PlaybackSettings {
            speed: default_speed(),
        }
    }
}

fn default_speed() -> f32 {
    1.0
}

/// Cosmetic scene settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneSettings {
    /// Vessel bobbing amplitude (metres).
    #[serde(default = "default_bob_amplitude")]
    pub bob_amplitude: f32,
    #[serde(default = "default_bob_frequency")]
    pub bob_frequency_hz: f32,
    #[serde(default = "default_roll_amplitude")]
    pub roll_amplitude_deg: f32,
    /// Particle count at full spill intensity.
    #[serde(default = "default_max_particles")]
    pub max_spill_particles: u32,
    /// Spill radius at full intensity (metres).
    #[serde(default = "default_spill_radius")]
    pub spill_radius: f32,
    #[serde(default = "default_blink")]
    pub warning_blink_hz: f32,
}

impl Default for SceneSettings {
    fn default() -> Self {
        SceneSettings {
            bob_amplitude: default_bob_amplitude(),
            bob_frequency_hz: default_bob_frequency(),
            roll_amplitude_deg: default_roll_amplitude(),
            max_spill_particles: default_max_particles(),
            spill_radius: default_spill_radius(),
            warning_blink_hz: default_blink(),
        }
    }
}

fn default_bob_amplitude() -> f32 {
    0.08
}

fn default_bob_frequency() -> f32 {
    0.5
}

fn default_roll_amplitude() -> f32 {
    1.5
}

fn default_max_particles() -> u32 {
    120
}

fn default_spill_radius() -> f32 {
    6.0
}

fn default_blink() -> f32 {
    2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wall_time_round_trips_display() {
        let t = WallTime::parse("14:22:10").unwrap();
        assert_eq!(t.to_string(), "14:22:10");
        assert_eq!(t, WallTime::new(14, 22, 10).unwrap());
    }

    #[test]
    fn wall_time_rejects_malformed() {
        for bad in ["14:22", "14:22:10:00", "24:00:00", "1:22:10", "aa:bb:cc", "12:60:00", ""] {
            assert!(WallTime::parse(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn intensity_clamps() {
        assert_eq!(Intensity::new(1.5).value(), 1.0);
        assert_eq!(Intensity::new(-0.5).value(), 0.0);
        assert_eq!(Intensity::new(f32::NAN).value(), 0.0);
    }

    #[test]
    fn deserialized_intensity_is_clamped() {
        let high: Intensity = serde_json::from_str("5.0").unwrap();
        assert_eq!(high.value(), 1.0);
        let low: Intensity = serde_json::from_str("-2").unwrap();
        assert_eq!(low.value(), 0.0);
        assert_eq!(serde_json::to_string(&Intensity::new(0.5)).unwrap(), "0.5");
    }

    #[test]
    fn vec3_lerp_midpoint() {
        let mid = Vec3::new(0.0, 0.0, 0.0).lerp(Vec3::new(10.0, -2.0, 4.0), 0.5);
        assert_eq!(mid, Vec3::new(5.0, -1.0, 2.0));
    }

    #[test]
    fn config_defaults_fill_missing_fields() {
        let config = EngineConfig::from_json(r#"{"scenario":"mooring_line_parting","playback":{}}"#).unwrap();
        assert_eq!(config.scenario, ScenarioId::MooringLineParting);
        assert_eq!(config.playback.speed, 1.0);
        assert_eq!(config.scene.max_spill_particles, 120);
    }

    #[test]
    fn config_rejects_unknown_scenario() {
        let err = EngineConfig::from_json(r#"{"scenario":"tank_overfill"}"#).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
    }

    #[test]
    fn playback_speed_is_clamped() {
        assert_eq!(PlaybackSettings { speed: 10.0 }.clamped_speed(), 4.0);
        assert_eq!(PlaybackSettings { speed: 0.01 }.clamped_speed(), 0.25);
    }
}
