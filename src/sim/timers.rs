//! Delayed beam resolution
//!
//! A fired beam stays visible for the post-fire delay before it either returns
//! to idle or retires. Each pending resolution is an explicit event carrying the
//! combatant it targets; the scheduler re-checks that the combatant is still
//! firing when the event comes due.

use serde::{Deserialize, Serialize};

use super::lane::CombatantId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(pub u64);

/// What happens to a beam once its delay runs out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BeamResolution {
    /// Missed or blocked: back to the idle pool
    ReturnToIdle,
    /// Scored a kill: weapon retires for good
    Retire,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingBeam {
    pub id: TimerId,
    pub combatant: CombatantId,
    pub due_ms: u64,
    pub resolution: BeamResolution,
}

/// Outstanding one-shot beam timers, cancelled by the combatant they target
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    pending: Vec<PendingBeam>,
    next_id: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(
        &mut self,
        combatant: CombatantId,
        due_ms: u64,
        resolution: BeamResolution,
    ) {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(PendingBeam {
            id,
            combatant,
            due_ms,
            resolution,
        });
    }

    /// Cancel every timer targeting a combatant
    pub fn cancel_for(&mut self, combatant: CombatantId) -> usize {
        let before = self.pending.len();
        self.pending.retain(|p| p.combatant != combatant);
        before - self.pending.len()
    }

    /// Cancel everything (teardown)
    pub fn cancel_all(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }

    /// Earliest due time among pending timers
    pub fn next_due(&self) -> Option<u64> {
        self.pending.iter().map(|p| p.due_ms).min()
    }

    /// Remove and return the earliest timer due at or before `now_ms`.
    /// Ties go to whichever was scheduled first.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<PendingBeam> {
        let (index, _) = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due_ms <= now_ms)
            .min_by_key(|(_, p)| (p.due_ms, p.id))?;
        Some(self.pending.remove(index))
    }

    pub fn pending(&self) -> &[PendingBeam] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Side;

    fn id(side: Side, lane: usize) -> CombatantId {
        CombatantId::new(side, lane)
    }

    #[test]
    fn test_pop_due_in_time_order() {
        let mut timers = TimerQueue::new();
        timers.schedule(id(Side::Ally, 0), 300, BeamResolution::ReturnToIdle);
        timers.schedule(id(Side::Enemy, 1), 100, BeamResolution::Retire);
        timers.schedule(id(Side::Ally, 2), 100, BeamResolution::ReturnToIdle);

        assert_eq!(timers.next_due(), Some(100));
        assert!(timers.pop_due(50).is_none());

        let first = timers.pop_due(200).unwrap();
        assert_eq!(first.combatant, id(Side::Enemy, 1));
        let second = timers.pop_due(200).unwrap();
        assert_eq!(second.combatant, id(Side::Ally, 2));
        assert!(timers.pop_due(200).is_none());
        assert_eq!(timers.len(), 1);
    }

    #[test]
    fn test_cancel() {
        let mut timers = TimerQueue::new();
        timers.schedule(id(Side::Ally, 0), 10, BeamResolution::ReturnToIdle);
        timers.schedule(id(Side::Ally, 1), 10, BeamResolution::ReturnToIdle);
        timers.schedule(id(Side::Enemy, 1), 10, BeamResolution::Retire);

        assert_eq!(timers.cancel_for(id(Side::Enemy, 1)), 1);
        assert_eq!(timers.cancel_for(id(Side::Enemy, 1)), 0);
        assert_eq!(timers.cancel_all(), 2);
        assert!(timers.is_empty());
        assert_eq!(timers.next_due(), None);
    }
}
