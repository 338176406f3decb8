//! Match state and core simulation types
//!
//! The scheduler owns everything here. Hosts get read access through the
//! accessors and `snapshot`, and drain the event queue; they never mutate
//! combatants or pools directly.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::collision::{OpponentView, Target, project_target};
use super::combatant::{Combatant, WeaponState};
use super::lane::{CombatantId, LaneRegistry, Side};
use super::outcome::{Outcome, compute_outcome};
use super::pools::{LanePools, Pool};
use super::timers::{BeamResolution, TimerQueue};
use super::word::WordBuffer;
use crate::consts::POST_FIRE_DELAY_MS;
use crate::error::{EngineError, Result};
use crate::settings::Settings;

/// Discrete happenings for sound/visual effects. Fire-and-forget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    BeamCharged { id: CombatantId },
    BeamFired { id: CombatantId, target: Target },
    CombatantDestroyed { id: CombatantId, by: CombatantId },
    BeamReset { id: CombatantId },
    BeamRetired { id: CombatantId },
    MatchEnded { outcome: Outcome },
}

/// One combatant as seen by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CombatantSnapshot {
    pub side: Side,
    pub lane: usize,
    pub weapon_state: WeaponState,
    pub alive: bool,
}

/// Read-only view of a match for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub now_ms: u64,
    pub lanes: Vec<CombatantSnapshot>,
    pub outcome: Outcome,
}

/// Complete match state
#[derive(Debug, Clone)]
pub struct MatchState {
    pub(crate) seed: u64,
    pub(crate) registry: LaneRegistry,
    /// Arena indexed by `LaneRegistry::slot`
    pub(crate) combatants: Vec<Combatant>,
    /// Indexed by `Side::index`
    pub(crate) pools: [LanePools; 2],
    pub(crate) rng: Pcg32,
    pub(crate) timers: TimerQueue,
    pub(crate) post_fire_delay_ms: u64,
    /// Match clock, advanced by the host
    pub(crate) now_ms: u64,
    pub(crate) tick_count: u64,
    pub(crate) outcome: Outcome,
    pub(crate) torn_down: bool,
    pub(crate) events: Vec<GameEvent>,
}

impl MatchState {
    /// Fresh match: every combatant alive and idle, every lane in its side's idle pool
    pub fn new(lane_count: usize, seed: u64) -> Self {
        let registry = LaneRegistry::new(lane_count);
        let combatants = registry.ids().map(Combatant::new).collect();
        log::info!("Match created: {} lanes, seed {}", lane_count, seed);
        Self {
            seed,
            registry,
            combatants,
            pools: [
                LanePools::new(Side::Ally, lane_count),
                LanePools::new(Side::Enemy, lane_count),
            ],
            rng: Pcg32::seed_from_u64(seed),
            timers: TimerQueue::new(),
            post_fire_delay_ms: POST_FIRE_DELAY_MS,
            now_ms: 0,
            tick_count: 0,
            outcome: Outcome::InProgress,
            torn_down: false,
            events: Vec::new(),
        }
    }

    pub fn from_settings(settings: &Settings, seed: u64) -> Self {
        Self::new(settings.lane_count, seed).with_post_fire_delay(settings.post_fire_delay_ms)
    }

    pub fn with_post_fire_delay(mut self, delay_ms: u64) -> Self {
        self.post_fire_delay_ms = delay_ms;
        self
    }

    /// Start over with the same lane count and timing
    pub fn restart(&mut self, seed: u64) {
        let delay = self.post_fire_delay_ms;
        *self = Self::new(self.registry.lane_count(), seed).with_post_fire_delay(delay);
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn registry(&self) -> &LaneRegistry {
        &self.registry
    }

    pub fn lane_count(&self) -> usize {
        self.registry.lane_count()
    }

    pub fn combatants(&self) -> &[Combatant] {
        &self.combatants
    }

    /// Combatant standing at `id`, if the lane exists in this match
    pub fn get(&self, id: CombatantId) -> Option<&Combatant> {
        self.registry
            .contains(id)
            .then(|| &self.combatants[self.registry.slot(id)])
    }

    /// Caller guarantees the id is in range
    pub(crate) fn combatant(&self, id: CombatantId) -> &Combatant {
        &self.combatants[self.registry.slot(id)]
    }

    pub fn pools(&self, side: Side) -> &LanePools {
        &self.pools[side.index()]
    }

    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    pub fn post_fire_delay_ms(&self) -> u64 {
        self.post_fire_delay_ms
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Outcome recorded when the last tick ended the match
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Outcome recomputed from the current combatants
    pub fn on_outcome(&self) -> Outcome {
        compute_outcome(&self.combatants)
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// No more ticks will be processed
    pub fn is_halted(&self) -> bool {
        self.torn_down || self.outcome.is_over()
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Hand queued events to the host
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Where a beam fired by `id` would land right now
    pub fn project_target(&self, id: CombatantId, word: &WordBuffer) -> Result<Target> {
        let id = self.registry.id(id.side, id.lane)?;
        let opponent = OpponentView::of(self.combatant(id.opposing()));
        Ok(project_target(word, id.lane, opponent))
    }

    /// Idle -> Charging, moving the lane into the charging pool
    pub fn begin_charge(&mut self, id: CombatantId) -> Result<()> {
        let id = self.registry.id(id.side, id.lane)?;
        let found = self.combatant(id).weapon();
        if found != WeaponState::Idle {
            return Err(EngineError::UnexpectedState {
                id,
                expected: WeaponState::Idle,
                found,
            });
        }
        self.advance(id)?;
        self.emit(GameEvent::BeamCharged { id });
        log::debug!("{} charging", id);
        Ok(())
    }

    /// Step one combatant's weapon cycle, keeping its pool in step
    pub(crate) fn advance(&mut self, id: CombatantId) -> Result<WeaponState> {
        let slot = self.registry.slot(id);
        let current = self.combatants[slot].weapon();
        let (Some(from), Some(to)) = (
            Pool::for_state(current),
            current.next().and_then(Pool::for_state),
        ) else {
            return Err(EngineError::RetiredAdvance(id));
        };
        self.move_pool(id, from, to)?;
        self.combatants[slot].advance_weapon_state()
    }

    pub(crate) fn move_pool(&mut self, id: CombatantId, from: Pool, to: Pool) -> Result<()> {
        self.pools[id.side.index()].move_lane(id.lane, from, to)
    }

    /// Take a weapon out of rotation: drop it from its pool and retire it
    pub(crate) fn halt_weapon(&mut self, id: CombatantId) -> Option<Pool> {
        let pool = self.pools[id.side.index()].halt(id.lane);
        let slot = self.registry.slot(id);
        self.combatants[slot].retire();
        pool
    }

    /// Kill `victim`. Returns false if it was already dead.
    pub(crate) fn destroy(&mut self, victim: CombatantId, by: CombatantId) -> bool {
        if !self.combatant(victim).is_alive() {
            return false;
        }
        self.halt_weapon(victim);
        let slot = self.registry.slot(victim);
        self.combatants[slot].destroy();
        let cancelled = self.timers.cancel_for(victim);
        if cancelled > 0 {
            log::debug!("Cancelled {} pending beam timer(s) for {}", cancelled, victim);
        }
        self.emit(GameEvent::CombatantDestroyed { id: victim, by });
        log::info!("{} destroyed by {}", victim, by);
        true
    }

    pub(crate) fn schedule_beam(&mut self, id: CombatantId, resolution: BeamResolution) {
        let due = self.now_ms.saturating_add(self.post_fire_delay_ms);
        self.timers.schedule(id, due, resolution);
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Move the clock forward. The clock never runs backwards.
    pub(crate) fn set_now(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    pub(crate) fn finish(&mut self, outcome: Outcome) {
        self.outcome = outcome;
        self.emit(GameEvent::MatchEnded { outcome });
        log::info!("Match over after {} ticks: {:?}", self.tick_count, outcome);
    }

    /// Stop the match and cancel every pending beam timer
    pub fn teardown(&mut self) {
        let cancelled = self.timers.cancel_all();
        self.torn_down = true;
        log::info!("Match torn down ({} pending timers cancelled)", cancelled);
    }

    /// Verify that identities sit in their slots and the pools agree with weapon states
    pub fn check_invariants(&self) -> Result<()> {
        for (slot, expected) in self.registry.ids().enumerate() {
            let id = self.combatants[slot].id();
            if id != expected {
                return Err(EngineError::MisplacedCombatant { slot, id });
            }
        }

        for side in Side::ALL {
            let pools = self.pools(side);
            for c in self.combatants.iter().filter(|c| c.side() == side) {
                let expected = Pool::for_state(c.weapon());
                let actual = pools.pool_of(c.lane());
                match (expected, actual) {
                    (Some(pool), found) if found != Some(pool) => {
                        return Err(EngineError::PoolDesync { id: c.id(), pool });
                    }
                    (None, Some(pool)) => {
                        return Err(EngineError::StrayLane { id: c.id(), pool });
                    }
                    _ => {}
                }
            }
            let derived = LanePools::derive(&self.combatants, side);
            if !pools.is_disjoint() || !pools.same_membership(&derived) {
                return Err(EngineError::PoolsDiverged(side));
            }
        }
        Ok(())
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.tick_count,
            now_ms: self.now_ms,
            lanes: self
                .combatants
                .iter()
                .map(|c| CombatantSnapshot {
                    side: c.side(),
                    lane: c.lane(),
                    weapon_state: c.weapon(),
                    alive: c.is_alive(),
                })
                .collect(),
            outcome: self.outcome,
        }
    }
}

/// Start a match with default timing
pub fn create_match(lane_count: usize, seed: u64) -> MatchState {
    MatchState::new(lane_count, seed)
}
