//! Per-side weapon state pools
//!
//! Index sets of lanes grouped by weapon state, kept so a random idle lane
//! can be picked without scanning the arena. The arena is the source of
//! truth: `derive` rebuilds the same sets from it for consistency checks.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::combatant::{Combatant, WeaponState};
use super::lane::{CombatantId, Side};
use crate::error::{EngineError, Result};

/// A non-terminal weapon state, as a pool selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pool {
    Idle,
    Charging,
    Firing,
}

impl Pool {
    pub const ALL: [Pool; 3] = [Pool::Idle, Pool::Charging, Pool::Firing];

    /// Pool a weapon state belongs to (Retired belongs to none)
    pub fn for_state(state: WeaponState) -> Option<Pool> {
        match state {
            WeaponState::Idle => Some(Pool::Idle),
            WeaponState::Charging => Some(Pool::Charging),
            WeaponState::Firing => Some(Pool::Firing),
            WeaponState::Retired => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanePools {
    side: Side,
    idle: Vec<usize>,
    charging: Vec<usize>,
    firing: Vec<usize>,
}

impl LanePools {
    /// Fresh pools with every lane idle
    pub fn new(side: Side, lane_count: usize) -> Self {
        Self {
            side,
            idle: (0..lane_count).collect(),
            charging: Vec::new(),
            firing: Vec::new(),
        }
    }

    /// Rebuild the pools for one side from combatant records
    pub fn derive(combatants: &[Combatant], side: Side) -> Self {
        let mut pools = Self {
            side,
            idle: Vec::new(),
            charging: Vec::new(),
            firing: Vec::new(),
        };
        for c in combatants.iter().filter(|c| c.side() == side) {
            if let Some(pool) = Pool::for_state(c.weapon()) {
                pools.lanes_mut(pool).push(c.lane());
            }
        }
        pools
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn lanes(&self, pool: Pool) -> &[usize] {
        match pool {
            Pool::Idle => &self.idle,
            Pool::Charging => &self.charging,
            Pool::Firing => &self.firing,
        }
    }

    fn lanes_mut(&mut self, pool: Pool) -> &mut Vec<usize> {
        match pool {
            Pool::Idle => &mut self.idle,
            Pool::Charging => &mut self.charging,
            Pool::Firing => &mut self.firing,
        }
    }

    /// Pool currently holding a lane, if any
    pub fn pool_of(&self, lane: usize) -> Option<Pool> {
        Pool::ALL
            .into_iter()
            .find(|pool| self.lanes(*pool).contains(&lane))
    }

    /// Move a lane between pools, appending it to `to`
    pub fn move_lane(&mut self, lane: usize, from: Pool, to: Pool) -> Result<()> {
        let side = self.side;
        let source = self.lanes_mut(from);
        let Some(pos) = source.iter().position(|l| *l == lane) else {
            return Err(EngineError::PoolDesync {
                id: CombatantId::new(side, lane),
                pool: from,
            });
        };
        source.remove(pos);
        self.lanes_mut(to).push(lane);
        Ok(())
    }

    /// Drop a lane from whichever pool holds it
    pub fn halt(&mut self, lane: usize) -> Option<Pool> {
        let pool = self.pool_of(lane)?;
        self.lanes_mut(pool).retain(|l| *l != lane);
        Some(pool)
    }

    /// Uniform pick among idle lanes
    pub fn pick_idle<R: Rng>(&self, rng: &mut R) -> Option<usize> {
        if self.idle.is_empty() {
            return None;
        }
        Some(self.idle[rng.random_range(0..self.idle.len())])
    }

    /// Same lanes in the same pools, ignoring order
    pub fn same_membership(&self, other: &LanePools) -> bool {
        Pool::ALL.into_iter().all(|pool| {
            let mut a = self.lanes(pool).to_vec();
            let mut b = other.lanes(pool).to_vec();
            a.sort_unstable();
            b.sort_unstable();
            a == b
        })
    }

    /// True if no lane appears twice across the three pools
    pub fn is_disjoint(&self) -> bool {
        let mut all: Vec<usize> = Pool::ALL
            .into_iter()
            .flat_map(|pool| self.lanes(pool).iter().copied())
            .collect();
        let total = all.len();
        all.sort_unstable();
        all.dedup();
        all.len() == total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_move_lane() {
        let mut pools = LanePools::new(Side::Ally, 3);
        pools.move_lane(1, Pool::Idle, Pool::Charging).unwrap();
        assert_eq!(pools.lanes(Pool::Idle), &[0, 2]);
        assert_eq!(pools.lanes(Pool::Charging), &[1]);
        assert_eq!(pools.pool_of(1), Some(Pool::Charging));
        assert!(pools.is_disjoint());
    }

    #[test]
    fn test_move_lane_desync() {
        let mut pools = LanePools::new(Side::Enemy, 2);
        let err = pools.move_lane(0, Pool::Firing, Pool::Idle).unwrap_err();
        assert!(matches!(
            err,
            EngineError::PoolDesync { id, pool: Pool::Firing }
                if id == CombatantId::new(Side::Enemy, 0)
        ));
        // Nothing moved
        assert_eq!(pools.lanes(Pool::Idle), &[0, 1]);
    }

    #[test]
    fn test_halt_removes_from_any_pool() {
        let mut pools = LanePools::new(Side::Ally, 3);
        pools.move_lane(2, Pool::Idle, Pool::Charging).unwrap();
        assert_eq!(pools.halt(2), Some(Pool::Charging));
        assert_eq!(pools.halt(0), Some(Pool::Idle));
        assert_eq!(pools.halt(0), None);
        assert_eq!(pools.lanes(Pool::Idle), &[1]);
        assert!(pools.lanes(Pool::Charging).is_empty());
    }

    #[test]
    fn test_pick_idle() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut pools = LanePools::new(Side::Ally, 4);
        for _ in 0..50 {
            let lane = pools.pick_idle(&mut rng).unwrap();
            assert!(lane < 4);
        }
        for lane in 0..4 {
            pools.halt(lane);
        }
        assert_eq!(pools.pick_idle(&mut rng), None);
    }

    #[test]
    fn test_derive_matches_fresh_pools() {
        let combatants: Vec<_> = (0..3)
            .map(|lane| Combatant::new(CombatantId::new(Side::Enemy, lane)))
            .collect();
        let derived = LanePools::derive(&combatants, Side::Enemy);
        assert!(derived.same_membership(&LanePools::new(Side::Enemy, 3)));
        // No ally records in the slice
        assert!(LanePools::derive(&combatants, Side::Ally).lanes(Pool::Idle).is_empty());
    }
}
