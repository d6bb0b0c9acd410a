// Typed errors with thiserror. Surface meaningful messages to JS.
// Playback itself never fails; these cover construction, config and lookups.

use thiserror::Error;

/// Engine error types.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Timeline has no events")]
    EmptyTimeline,

    #[error("Timeline event {index} at {time}s precedes the previous event at {previous}s")]
    OutOfOrder { index: usize, time: u32, previous: u32 },

    #[error("Invalid timestamp {0:?}, expected HH:MM:SS")]
    InvalidTimestamp(String),

    #[error("Script has {steps} steps but timeline has {events} events")]
    ScriptMismatch { steps: usize, events: usize },

    #[error("Step {index} holds for {millis}ms, outside 200..=2500ms")]
    InvalidHold { index: usize, millis: u64 },

    #[error("Step {index} has an invalid ramp: {message}")]
    InvalidRamp { index: usize, message: String },

    #[error("Timeline event {index} references unknown {kind} {id:?}")]
    UnknownReference {
        index: usize,
        kind: &'static str,
        id: String,
    },

    #[error("Step {index} out of range for a timeline of {len} events")]
    StepOutOfRange { index: usize, len: usize },

    #[error("Sequencer is playing")]
    Busy,

    #[error("Unknown panel {0:?}")]
    UnknownPanel(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = EngineError::InvalidConfig("missing field".to_string());
        assert!(err.to_string().contains("missing field"));
    }

    #[test]
    fn out_of_range_names_bounds() {
        let err = EngineError::StepOutOfRange { index: 9, len: 9 };
        assert_eq!(
            err.to_string(),
            "Step 9 out of range for a timeline of 9 events"
        );
    }

    #[test]
    fn serde_errors_convert() {
        let err: EngineError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, EngineError::Serialization(_)));
    }
}
