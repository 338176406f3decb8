//! Engine error types
//!
//! Nothing here is user-facing. Apart from settings parsing, every variant is
//! an internal consistency violation.

use thiserror::Error;

use crate::sim::{CombatantId, Pool, Side, WeaponState};

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("lane {lane} out of range (match has {lane_count} lanes)")]
    LaneOutOfRange { lane: usize, lane_count: usize },

    #[error("{id} not found in {pool:?} pool")]
    PoolDesync { id: CombatantId, pool: Pool },

    #[error("{id} is retired but still in {pool:?} pool")]
    StrayLane { id: CombatantId, pool: Pool },

    #[error("{0:?} pools diverged from combatant states")]
    PoolsDiverged(Side),

    #[error("arena slot {slot} holds {id}")]
    MisplacedCombatant { slot: usize, id: CombatantId },

    #[error("{0} is retired and cannot advance its weapon")]
    RetiredAdvance(CombatantId),

    #[error("{id} expected {expected:?}, found {found:?}")]
    UnexpectedState {
        id: CombatantId,
        expected: WeaponState,
        found: WeaponState,
    },

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// Surface an invariant breach hit while the engine was running.
///
/// Always logged; debug and test builds also panic.
pub(crate) fn report_breach(err: &EngineError) {
    log::error!("invariant breach: {err}");
    debug_assert!(false, "invariant breach: {err}");
}
