//! Lane registry
//!
//! Maps (side, lane) to a stable combatant identity and an arena slot.

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Which line a combatant belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    /// Player's line (bottom row)
    Ally,
    /// Opposing line (top row)
    Enemy,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Ally, Side::Enemy];

    pub fn opposing(self) -> Side {
        match self {
            Side::Ally => Side::Enemy,
            Side::Enemy => Side::Ally,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Side::Ally => 0,
            Side::Enemy => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Ally => "ally",
            Side::Enemy => "enemy",
        }
    }
}

/// Identity of a combatant, derived from where it stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CombatantId {
    pub side: Side,
    pub lane: usize,
}

impl CombatantId {
    pub fn new(side: Side, lane: usize) -> Self {
        Self { side, lane }
    }

    /// The combatant across the lane
    pub fn opposing(self) -> Self {
        Self::new(self.side.opposing(), self.lane)
    }
}

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.side.as_str(), self.lane)
    }
}

/// The fixed set of lanes in a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneRegistry {
    lane_count: usize,
}

impl LaneRegistry {
    pub fn new(lane_count: usize) -> Self {
        Self { lane_count }
    }

    pub fn lane_count(&self) -> usize {
        self.lane_count
    }

    pub fn lanes(&self) -> Range<usize> {
        0..self.lane_count
    }

    /// Every combatant id, ally side first, lanes ascending (arena order)
    pub fn ids(&self) -> impl Iterator<Item = CombatantId> + '_ {
        Side::ALL
            .into_iter()
            .flat_map(move |side| self.lanes().map(move |lane| CombatantId::new(side, lane)))
    }

    /// Checked lookup of an id
    pub fn id(&self, side: Side, lane: usize) -> Result<CombatantId> {
        if lane >= self.lane_count {
            return Err(EngineError::LaneOutOfRange {
                lane,
                lane_count: self.lane_count,
            });
        }
        Ok(CombatantId::new(side, lane))
    }

    pub fn contains(&self, id: CombatantId) -> bool {
        id.lane < self.lane_count
    }

    /// Arena index for an id. Caller guarantees the id is in range.
    pub fn slot(&self, id: CombatantId) -> usize {
        id.side.index() * self.lane_count + id.lane
    }
}
