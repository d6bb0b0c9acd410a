// Incident animation sequencer.
// One task walks the script forward; every commit replaces the whole state.
// Each run owns a generation number. stop/reset advance it, and a stale run exits at its next check
// without writing, so already-scheduled waits can never overwrite a reset.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::clock::Clock;
use crate::error::EngineError;
use crate::scenario::Scenario;
use crate::state::AnimationState;
use crate::types::{PlaybackSettings, StepIndex};

type Listener = Rc<dyn Fn(&AnimationState)>;

/// How a call to [`Sequencer::run`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// Every step applied; the state rests on the last step.
    Completed,
    /// Stopped or reset before the last step.
    Cancelled,
    /// Another run was already in flight.
    Ignored,
}

impl RunOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunOutcome::Completed => "completed",
            RunOutcome::Cancelled => "cancelled",
            RunOutcome::Ignored => "ignored",
        }
    }
}

struct Shared {
    state: RefCell<AnimationState>,
    playing: Cell<bool>,
    generation: Cell<u64>,
    listeners: RefCell<Vec<Listener>>,
}

impl Shared {
    fn advance_generation(&self) -> u64 {
        let next = self.generation.get().wrapping_add(1);
        self.generation.set(next);
        next
    }
}

/// Clears `playing` when a run ends, returns early, or is dropped mid-wait.
/// A run superseded by stop/reset leaves the flag to whoever advanced the generation.
struct PlayingGuard<'a> {
    shared: &'a Shared,
    generation: u64,
}

impl Drop for PlayingGuard<'_> {
    fn drop(&mut self) {
        if self.shared.generation.get() == self.generation {
            self.shared.playing.set(false);
        }
    }
}

/// Drives a scenario's script against a shared [`AnimationState`].
///
/// Cloning is cheap and every clone drives the same state, so a UI can keep one
/// handle for reads while another is moved into the playback task.
pub struct Sequencer<C: Clock> {
    scenario: Rc<Scenario>,
    clock: Rc<C>,
    speed: f32,
    shared: Rc<Shared>,
}

impl<C: Clock> Clone for Sequencer<C> {
    fn clone(&self) -> Self {
        Sequencer {
            scenario: Rc::clone(&self.scenario),
            clock: Rc::clone(&self.clock),
            speed: self.speed,
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<C: Clock> Sequencer<C> {
    pub fn new(scenario: Scenario, clock: C, playback: &PlaybackSettings) -> Self {
        let initial = scenario.initial_state();
        Sequencer {
            scenario: Rc::new(scenario),
            clock: Rc::new(clock),
            speed: playback.clamped_speed(),
            shared: Rc::new(Shared {
                state: RefCell::new(initial),
                playing: Cell::new(false),
                generation: Cell::new(0),
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn snapshot(&self) -> AnimationState {
        self.shared.state.borrow().clone()
    }

    pub fn current_step(&self) -> StepIndex {
        self.shared.state.borrow().current_step
    }

    pub fn is_playing(&self) -> bool {
        self.shared.playing.get()
    }

    /// Register a callback invoked with the new state after every commit.
    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(&AnimationState) + 'static,
    {
        self.shared.listeners.borrow_mut().push(Rc::new(listener));
    }

    pub fn clear_listeners(&self) {
        self.shared.listeners.borrow_mut().clear();
    }

    /// Play the script once from the initial state.
    ///
    /// Returns [`RunOutcome::Ignored`] without touching anything if a run is
    /// already in flight.
    pub async fn run(&self) -> RunOutcome {
        if self.shared.playing.get() {
            debug!(scenario = ?self.scenario.id(), "run ignored, already playing");
            return RunOutcome::Ignored;
        }
        let generation = self.shared.advance_generation();
        self.shared.playing.set(true);
        let _playing = PlayingGuard {
            shared: &self.shared,
            generation,
        };

        let steps = self.scenario.script().steps();
        info!(scenario = ?self.scenario.id(), steps = steps.len(), speed = self.speed, "playback started");

        let mut current = self.scenario.initial_state();
        self.publish(current.clone());

        let last = steps.len() - 1;
        for (i, step) in steps.iter().enumerate() {
            let index = StepIndex::new(i);
            let from = current.clone();
            let ticks = step.tick_count();

            for tick in 1..=ticks {
                if !self.is_current(generation) {
                    debug!(scenario = ?self.scenario.id(), step = i, "playback cancelled");
                    return RunOutcome::Cancelled;
                }
                current = step.frame(&from, index, tick);
                self.publish(current.clone());

                if tick < ticks {
                    if let Some(wait) = step.tick_duration() {
                        self.clock.sleep(self.scaled(wait)).await;
                    }
                }
            }

            if let Ok(event) = self.scenario.event(index) {
                debug!(step = i, label = %event.label, status = ?event.status, "step applied");
            }

            if i < last {
                self.clock.sleep(self.scaled(step.hold())).await;
            }
        }

        info!(scenario = ?self.scenario.id(), "playback completed");
        RunOutcome::Completed
    }

    /// Halt any in-flight run, leaving the state where it is.
    pub fn stop(&self) {
        if self.shared.playing.get() {
            debug!(scenario = ?self.scenario.id(), step = self.current_step().as_usize(), "playback stopped");
        }
        self.shared.advance_generation();
        self.shared.playing.set(false);
    }

    /// Restore the initial state and halt any in-flight run.
    pub fn reset(&self) {
        self.stop();
        self.publish(self.scenario.initial_state());
    }

    /// Jump to the settled state of step `index`. Only while idle.
    pub fn seek(&self, index: StepIndex) -> Result<(), EngineError> {
        if self.shared.playing.get() {
            return Err(EngineError::Busy);
        }
        let state = self.scenario.state_at(index)?;
        self.publish(state);
        Ok(())
    }

    fn is_current(&self, generation: u64) -> bool {
        self.shared.generation.get() == generation
    }

    fn scaled(&self, wait: Duration) -> Duration {
        // Scale in whole nanoseconds so 1x waits stay exact.
        Duration::from_nanos((wait.as_nanos() as f64 / self.speed as f64).round() as u64)
    }

    fn publish(&self, state: AnimationState) {
        *self.shared.state.borrow_mut() = state.clone();
        // Listeners may call back into the sequencer; hold no borrows while they run.
        let listeners: Vec<Listener> = self.shared.listeners.borrow().clone();
        for listener in listeners {
            listener(&state);
        }
    }
}
