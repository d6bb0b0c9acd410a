// repex_engine: RepEx Rust/WASM engine
// Incident data, playback sequencing, scene composition and search live here; JS only renders.

mod catalog;
mod clock;
mod error;
mod incidents;
mod presentation;
mod scenario;
mod scene;
mod script;
mod sequencer;
mod state;
mod timeline;
mod types;

use std::fmt::Display;

use serde::Serialize;
use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

pub use catalog::{scenario as load_scenario, summaries, ScenarioSummary};
pub use clock::{BrowserClock, Clock};
pub use error::EngineError;
pub use incidents::{register, search, Incident, ReportStatus, SearchQuery, Severity};
pub use presentation::{
    incident_summary, panel_details, status_legend, step_view, timeline_rows, IncidentSummary,
    PanelDetails, PanelKind, PanelState, StepView, TimelineRow,
};
pub use scenario::{Equipment, EquipmentStatus, IncidentMeta, Personnel, Scenario};
pub use scene::{compose_frame, Primitive, SceneFrame, SceneLayout};
pub use script::{Action, Ramp, Script, ScriptStep};
pub use sequencer::{RunOutcome, Sequencer};
pub use state::AnimationState;
pub use timeline::{Timeline, TimelineEvent};
pub use types::*;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn js_error(err: impl Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| js_error(EngineError::from(e)))
}

/// Incident reconstruction player exposed to JavaScript.
/// State and scene queries return JSON strings; playback returns a promise.
#[wasm_bindgen]
pub struct IncidentPlayer {
    sequencer: Sequencer<BrowserClock>,
    scene_settings: SceneSettings,
    panels: PanelState,
}

#[wasm_bindgen]
impl IncidentPlayer {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<IncidentPlayer, JsValue> {
        let config = EngineConfig::from_json(config_json).map_err(js_error)?;
        let scenario = catalog::scenario(config.scenario).map_err(js_error)?;

        Ok(IncidentPlayer {
            sequencer: Sequencer::new(scenario, BrowserClock, &config.playback),
            scene_settings: config.scene,
            panels: PanelState::default(),
        })
    }

    /// Start playback. Resolves with "completed", "cancelled" or "ignored".
    pub fn play(&self) -> js_sys::Promise {
        let sequencer = self.sequencer.clone();
        future_to_promise(async move {
            let outcome = sequencer.run().await;
            Ok(JsValue::from_str(outcome.as_str()))
        })
    }

    pub fn stop(&self) {
        self.sequencer.stop();
    }

    pub fn reset(&self) {
        self.sequencer.reset();
    }

    pub fn seek(&self, index: usize) -> Result<(), JsValue> {
        self.sequencer.seek(StepIndex::new(index)).map_err(js_error)
    }

    pub fn is_playing(&self) -> bool {
        self.sequencer.is_playing()
    }

    pub fn current_step(&self) -> usize {
        self.sequencer.current_step().as_usize()
    }

    pub fn step_count(&self) -> usize {
        self.sequencer.scenario().timeline().len()
    }

    /// Call `callback(stateJson)` after every state change. Replaces any previous listener.
    pub fn set_listener(&self, callback: js_sys::Function) {
        self.sequencer.clear_listeners();
        self.sequencer.subscribe(move |state| match serde_json::to_string(state) {
            Ok(json) => {
                if let Err(err) = callback.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
                    warn!(error = ?err, step = state.current_step.as_usize(), "state listener threw");
                }
            }
            Err(err) => warn!(error = %err, "state serialization failed"),
        });
    }

    pub fn state_json(&self) -> Result<String, JsValue> {
        to_json(&self.sequencer.snapshot())
    }

    /// Scene description for the current state at wall-clock `time_secs`.
    pub fn frame_json(&self, time_secs: f32) -> Result<String, JsValue> {
        let frame = compose_frame(
            &self.sequencer.snapshot(),
            self.sequencer.scenario().layout(),
            &self.scene_settings,
            time_secs,
        );
        to_json(&frame)
    }

    pub fn step_view_json(&self) -> Result<String, JsValue> {
        let view = step_view(self.sequencer.scenario(), self.sequencer.current_step()).map_err(js_error)?;
        to_json(&view)
    }

    pub fn timeline_json(&self) -> Result<String, JsValue> {
        to_json(&timeline_rows(
            self.sequencer.scenario(),
            self.sequencer.current_step(),
        ))
    }

    pub fn summary_json(&self) -> Result<String, JsValue> {
        let summary = incident_summary(self.sequencer.scenario(), self.sequencer.current_step())
            .map_err(js_error)?;
        to_json(&summary)
    }

    /// Flip a detail panel ("equipment", "personnel", "timeline"). Returns whether it is now open.
    pub fn toggle_panel(&mut self, name: &str) -> Result<bool, JsValue> {
        let panel: PanelKind = name.parse().map_err(js_error)?;
        Ok(self.panels.toggle(panel))
    }

    pub fn panels_json(&self) -> Result<String, JsValue> {
        to_json(&self.panels.flags())
    }

    pub fn panel_details_json(&self) -> Result<String, JsValue> {
        let details = panel_details(
            self.sequencer.scenario(),
            &self.panels,
            self.sequencer.current_step(),
        )
        .map_err(js_error)?;
        to_json(&details)
    }
}

/// Filter the incident register. `query_json` follows `SearchQuery`; `{}` returns everything.
#[wasm_bindgen]
pub fn search_incidents(query_json: &str) -> Result<String, JsValue> {
    let query = SearchQuery::from_json(query_json).map_err(js_error)?;
    let incidents = register();
    to_json(&search(&incidents, &query))
}

#[wasm_bindgen]
pub fn scenarios_json() -> Result<String, JsValue> {
    to_json(&summaries().map_err(js_error)?)
}

#[wasm_bindgen]
pub fn status_legend_json() -> Result<String, JsValue> {
    to_json(&status_legend())
}
