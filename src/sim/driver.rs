//! Tick driver
//!
//! Turns elapsed host time into match ticks and due beam timers, processed in
//! time order on a single timeline. Timers due at the same instant as a tick
//! run first.

use super::outcome::Outcome;
use super::state::{GameEvent, MatchState, Snapshot};
use super::tick::{run_timers, tick};
use super::word::WordBuffer;
use crate::consts::{MAX_CATCH_UP_MS, MAX_TICKS_PER_ADVANCE};
use crate::error::Result;
use crate::settings::Settings;

#[derive(Debug, Clone)]
pub struct MatchDriver {
    state: MatchState,
    tick_interval_ms: u64,
    next_tick_ms: u64,
}

impl MatchDriver {
    /// First tick lands one interval after the match starts
    pub fn new(settings: &Settings, seed: u64) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            state: MatchState::from_settings(settings, seed),
            tick_interval_ms: settings.tick_interval_ms,
            next_tick_ms: settings.tick_interval_ms,
        })
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    pub fn outcome(&self) -> Outcome {
        self.state.outcome()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    /// Run the match forward by `elapsed_ms` of host time. Returns ticks run.
    ///
    /// Elapsed time is clamped to `MAX_CATCH_UP_MS` and at most
    /// `MAX_TICKS_PER_ADVANCE` ticks run per call. Time past the last of those
    /// ticks is dropped rather than replayed.
    pub fn advance(&mut self, elapsed_ms: u64, word: &WordBuffer) -> u32 {
        if self.state.is_torn_down() {
            return 0;
        }
        let elapsed_ms = elapsed_ms.min(MAX_CATCH_UP_MS);
        let mut target = self.state.now_ms().saturating_add(elapsed_ms);
        let mut ticks = 0;

        loop {
            let next_timer = self.state.timers().next_due().filter(|due| *due <= target);
            let next_tick = (!self.state.is_halted() && self.next_tick_ms <= target)
                .then_some(self.next_tick_ms);

            match (next_timer, next_tick) {
                (Some(due), Some(at)) if due <= at => {
                    run_timers(&mut self.state, due);
                }
                (Some(due), None) => {
                    run_timers(&mut self.state, due);
                }
                (_, Some(at)) => {
                    run_timers(&mut self.state, at);
                    tick(&mut self.state, word);
                    self.next_tick_ms = at.saturating_add(self.tick_interval_ms);
                    ticks += 1;
                    if ticks >= MAX_TICKS_PER_ADVANCE && self.next_tick_ms <= target {
                        log::warn!(
                            "Tick backlog: dropping {} ms after {} ticks",
                            target - at,
                            ticks
                        );
                        target = at;
                        break;
                    }
                }
                (None, None) => break,
            }
        }

        run_timers(&mut self.state, target);
        ticks
    }

    /// Start a new match with the same settings
    pub fn restart(&mut self, seed: u64) {
        self.state.restart(seed);
        self.next_tick_ms = self.tick_interval_ms;
    }

    /// Stop ticking and cancel every pending beam timer
    pub fn teardown(&mut self) {
        self.state.teardown();
    }
}
