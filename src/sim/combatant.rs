//! Combatant model
//!
//! One record per (side, lane). Weapon state and liveness are only mutated by
//! the scheduler.

use serde::{Deserialize, Serialize};

use super::lane::{CombatantId, Side};
use crate::error::{EngineError, Result};

/// Beam life cycle of a combatant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WeaponState {
    #[default]
    Idle,
    Charging,
    Firing,
    /// Terminal: the weapon never cycles again
    Retired,
}

impl WeaponState {
    /// Next state in the Idle -> Charging -> Firing -> Idle cycle
    pub fn next(self) -> Option<WeaponState> {
        match self {
            WeaponState::Idle => Some(WeaponState::Charging),
            WeaponState::Charging => Some(WeaponState::Firing),
            WeaponState::Firing => Some(WeaponState::Idle),
            WeaponState::Retired => None,
        }
    }

    pub fn is_retired(self) -> bool {
        self == WeaponState::Retired
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    id: CombatantId,
    weapon: WeaponState,
    alive: bool,
}

impl Combatant {
    pub fn new(id: CombatantId) -> Self {
        Self {
            id,
            weapon: WeaponState::Idle,
            alive: true,
        }
    }

    pub fn id(&self) -> CombatantId {
        self.id
    }

    pub fn side(&self) -> Side {
        self.id.side
    }

    pub fn lane(&self) -> usize {
        self.id.lane
    }

    pub fn weapon(&self) -> WeaponState {
        self.weapon
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Step the weapon cycle and return the new state
    pub(crate) fn advance_weapon_state(&mut self) -> Result<WeaponState> {
        let next = self
            .weapon
            .next()
            .ok_or(EngineError::RetiredAdvance(self.id))?;
        self.weapon = next;
        Ok(next)
    }

    pub(crate) fn retire(&mut self) {
        self.weapon = WeaponState::Retired;
    }

    /// Kill the combatant. Returns false if it was already dead.
    pub(crate) fn destroy(&mut self) -> bool {
        if !self.alive {
            return false;
        }
        self.alive = false;
        self.retire();
        true
    }
}
