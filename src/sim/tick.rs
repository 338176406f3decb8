//! Fixed-interval match tick
//!
//! Each tick runs, in order: fire resolution for every charged weapon, one
//! random charge per side, and the end-of-match check. Beam timers scheduled by
//! fire resolution are fired separately through `run_timers`.

use super::collision::{OpponentView, project_target};
use super::combatant::WeaponState;
use super::lane::{CombatantId, Side};
use super::outcome::{Outcome, compute_outcome};
use super::state::{GameEvent, MatchState};
use super::timers::{BeamResolution, PendingBeam};
use super::word::WordBuffer;
use crate::error::report_breach;

/// Advance the match by one tick
pub fn tick(state: &mut MatchState, word: &WordBuffer) -> Outcome {
    if state.is_halted() {
        return state.outcome;
    }
    state.tick_count += 1;

    resolve_fire(state, word);
    select_charges(state);

    let outcome = compute_outcome(&state.combatants);
    if outcome.is_over() {
        state.finish(outcome);
    }
    outcome
}

/// Fire every charged weapon and resolve its shot.
///
/// Targets are classified against the arena as it stood before this pass, so
/// lanes where both sides fire at once resolve the same way in any order.
fn resolve_fire(state: &mut MatchState, word: &WordBuffer) {
    let before: Vec<OpponentView> = state.combatants.iter().map(OpponentView::of).collect();
    let shooters: Vec<CombatantId> = state
        .combatants
        .iter()
        .filter(|c| c.weapon() == WeaponState::Charging)
        .map(|c| c.id())
        .collect();

    let mut kills = Vec::new();
    for id in shooters {
        if let Err(err) = state.advance(id) {
            report_breach(&err);
            continue;
        }

        let opponent = before[state.registry.slot(id.opposing())];
        let target = project_target(word, id.lane, opponent);
        state.emit(GameEvent::BeamFired { id, target });
        log::debug!("{} fired: {:?}", id, target);

        let resolution = if target.is_kill() {
            kills.push(id);
            BeamResolution::Retire
        } else {
            BeamResolution::ReturnToIdle
        };
        state.schedule_beam(id, resolution);
    }

    for shooter in kills {
        state.destroy(shooter.opposing(), shooter);
    }
}

/// Put one random idle weapon per side on charge
fn select_charges(state: &mut MatchState) {
    for side in Side::ALL {
        let Some(lane) = state.pools[side.index()].pick_idle(&mut state.rng) else {
            log::debug!("No idle {} lanes to charge", side.as_str());
            continue;
        };
        if let Err(err) = state.begin_charge(CombatantId::new(side, lane)) {
            report_breach(&err);
        }
    }
}

/// Fire every beam timer due by `now_ms`, earliest first. Returns how many fired.
///
/// Timers keep firing after the match is decided; only teardown stops them.
pub fn run_timers(state: &mut MatchState, now_ms: u64) -> usize {
    state.set_now(now_ms);
    let mut fired = 0;
    while let Some(pending) = state.timers.pop_due(state.now_ms) {
        resolve_beam(state, pending);
        fired += 1;
    }
    fired
}

fn resolve_beam(state: &mut MatchState, pending: PendingBeam) {
    let id = pending.combatant;
    let weapon = state.combatant(id).weapon();
    if weapon != WeaponState::Firing {
        log::debug!("Stale beam timer for {} ({:?}), skipping", id, weapon);
        return;
    }

    match pending.resolution {
        BeamResolution::ReturnToIdle => {
            if let Err(err) = state.advance(id) {
                report_breach(&err);
                return;
            }
            state.emit(GameEvent::BeamReset { id });
        }
        BeamResolution::Retire => {
            state.halt_weapon(id);
            state.emit(GameEvent::BeamRetired { id });
            log::debug!("{} weapon retired", id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Pool, create_match};
    use proptest::prelude::*;

    fn ally(lane: usize) -> CombatantId {
        CombatantId::new(Side::Ally, lane)
    }

    fn enemy(lane: usize) -> CombatantId {
        CombatantId::new(Side::Enemy, lane)
    }

    #[test]
    fn test_first_tick_charges_one_lane_per_side() {
        let mut state = create_match(5, 42);
        let outcome = tick(&mut state, &WordBuffer::default());
        assert_eq!(outcome, Outcome::InProgress);
        assert_eq!(state.tick_count(), 1);
        for side in Side::ALL {
            assert_eq!(state.pools(side).lanes(Pool::Charging).len(), 1);
            assert_eq!(state.pools(side).lanes(Pool::Idle).len(), 4);
        }
        state.check_invariants().unwrap();
    }

    #[test]
    fn test_single_lane_win() {
        let mut state = create_match(1, 7);
        state.begin_charge(ally(0)).unwrap();

        let outcome = tick(&mut state, &WordBuffer::new("a"));
        assert_eq!(outcome, Outcome::Win);
        assert!(!state.combatant(enemy(0)).is_alive());
        assert!(state.combatant(ally(0)).is_alive());
        assert_eq!(state.combatant(ally(0)).weapon(), WeaponState::Firing);
        state.check_invariants().unwrap();

        // The beam stays up for the post-fire delay, then retires
        let delay = state.post_fire_delay_ms();
        assert_eq!(run_timers(&mut state, delay - 1), 0);
        assert_eq!(run_timers(&mut state, delay), 1);
        assert_eq!(state.combatant(ally(0)).weapon(), WeaponState::Retired);
        assert!(state.pools(Side::Ally).pool_of(0).is_none());
        assert_eq!(state.on_outcome(), Outcome::Win);
        state.check_invariants().unwrap();
    }

    #[test]
    fn test_mutual_destruction_is_tie() {
        let mut state = create_match(3, 3);
        for lane in 0..3 {
            state.begin_charge(ally(lane)).unwrap();
            state.begin_charge(enemy(lane)).unwrap();
        }

        let outcome = tick(&mut state, &WordBuffer::new("aei"));
        assert_eq!(outcome, Outcome::Tie);
        assert!(state.combatants().iter().all(|c| !c.is_alive()));
        assert!(state
            .combatants()
            .iter()
            .all(|c| c.weapon() == WeaponState::Retired));
        // Every victim's own beam timer was cancelled with it
        assert!(state.timers().is_empty());
        state.check_invariants().unwrap();
    }

    #[test]
    fn test_consonant_blocks_and_beam_returns() {
        let mut state = create_match(2, 11);
        state.begin_charge(ally(0)).unwrap();

        tick(&mut state, &WordBuffer::new("cat"));
        assert!(state.combatant(enemy(0)).is_alive());
        assert!(state.events().contains(&GameEvent::BeamFired {
            id: ally(0),
            target: crate::sim::Target::Consonant,
        }));

        // Still firing inside the delay window, so not selectable
        assert!(!state.pools(Side::Ally).lanes(Pool::Idle).contains(&0));

        let delay = state.post_fire_delay_ms();
        run_timers(&mut state, delay);
        assert_eq!(state.combatant(ally(0)).weapon(), WeaponState::Idle);
        assert!(state.pools(Side::Ally).lanes(Pool::Idle).contains(&0));
        assert!(state.events().contains(&GameEvent::BeamReset { id: ally(0) }));
        state.check_invariants().unwrap();
    }

    #[test]
    fn test_firing_opponent_blocks_beam() {
        let mut state = create_match(1, 5);
        state.begin_charge(enemy(0)).unwrap();
        // Enemy fires into a consonant and stays firing for the delay window
        tick(&mut state, &WordBuffer::new("x"));
        assert_eq!(state.combatant(enemy(0)).weapon(), WeaponState::Firing);
        assert_eq!(state.combatant(ally(0)).weapon(), WeaponState::Charging);

        // Ally fires through a vowel while the enemy beam is still up
        tick(&mut state, &WordBuffer::new("o"));
        assert!(state.events().contains(&GameEvent::BeamFired {
            id: ally(0),
            target: crate::sim::Target::OtherBeam,
        }));
        assert!(state.combatant(enemy(0)).is_alive());
        assert_eq!(state.outcome(), Outcome::InProgress);
        state.check_invariants().unwrap();
    }

    #[test]
    fn test_no_ticks_after_outcome() {
        let mut state = create_match(1, 7);
        state.begin_charge(ally(0)).unwrap();
        tick(&mut state, &WordBuffer::default());
        assert_eq!(state.outcome(), Outcome::Win);

        let ticks = state.tick_count();
        assert_eq!(tick(&mut state, &WordBuffer::default()), Outcome::Win);
        assert_eq!(state.tick_count(), ticks);
        // The pending retire still completes
        assert_eq!(run_timers(&mut state, u64::MAX), 1);
        assert_eq!(state.combatant(ally(0)).weapon(), WeaponState::Retired);
    }

    #[test]
    fn test_teardown_stops_everything() {
        let mut state = create_match(2, 8);
        state.begin_charge(ally(1)).unwrap();
        tick(&mut state, &WordBuffer::new("b"));
        assert!(!state.timers().is_empty());

        state.teardown();
        let frozen = state.snapshot();
        tick(&mut state, &WordBuffer::default());
        assert_eq!(run_timers(&mut state, u64::MAX), 0);
        assert_eq!(state.snapshot().lanes, frozen.lanes);
        assert_eq!(state.tick_count(), frozen.tick);
    }

    #[test]
    fn test_stale_timer_is_skipped() {
        let mut state = create_match(1, 2);
        state.schedule_beam(ally(0), BeamResolution::ReturnToIdle);
        // Ally is idle, not firing: the timer is a no-op
        assert_eq!(run_timers(&mut state, u64::MAX), 1);
        assert_eq!(state.combatant(ally(0)).weapon(), WeaponState::Idle);
        assert!(state.events().is_empty());
        state.check_invariants().unwrap();
    }

    #[test]
    fn test_determinism() {
        let words = ["", "ta", "aeiou", "zzz", "a e", "u"];
        let run = |seed| {
            let mut state = create_match(7, seed);
            for (i, word) in words.iter().cycle().take(40).enumerate() {
                tick(&mut state, &WordBuffer::new(word));
                run_timers(&mut state, (i as u64 + 1) * 3000 + 1000);
            }
            state.snapshot()
        };
        assert_eq!(run(99), run(99));
    }

    proptest! {
        #[test]
        fn prop_invariants_hold_every_tick(
            seed in any::<u64>(),
            lanes in 1usize..8,
            words in proptest::collection::vec("[a-z ]{0,8}", 1..60),
        ) {
            let mut state = create_match(lanes, seed);
            let ids: Vec<_> = state.combatants().iter().map(|c| c.id()).collect();
            let mut retired = vec![false; ids.len()];

            for (i, word) in words.iter().enumerate() {
                let now = i as u64 * 3000;
                run_timers(&mut state, now);
                tick(&mut state, &WordBuffer::new(word));
                prop_assert!(state.check_invariants().is_ok());

                for (slot, c) in state.combatants().iter().enumerate() {
                    prop_assert_eq!(c.id(), ids[slot]);
                    if retired[slot] {
                        prop_assert_eq!(c.weapon(), WeaponState::Retired);
                    }
                    retired[slot] = c.weapon() == WeaponState::Retired;
                }
                for side in Side::ALL {
                    prop_assert!(state.pools(side).is_disjoint());
                }

                let delay = state.post_fire_delay_ms();
                run_timers(&mut state, now + delay);
                prop_assert!(state.check_invariants().is_ok());
            }

            if state.outcome().is_over() {
                prop_assert_eq!(state.outcome(), state.on_outcome());
            }
        }
    }
}
