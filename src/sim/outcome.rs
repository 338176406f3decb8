//! Match outcome
//!
//! A match is decided once no lane holds two living combatants; the side
//! with more survivors wins.

use serde::{Deserialize, Serialize};

use super::combatant::Combatant;
use super::lane::Side;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Outcome {
    #[default]
    InProgress,
    Win,
    Lose,
    Tie,
}

impl Outcome {
    pub fn is_over(self) -> bool {
        self != Outcome::InProgress
    }
}

/// Pure outcome check over the full combatant set
pub fn compute_outcome(combatants: &[Combatant]) -> Outcome {
    let lane_count = combatants.iter().map(|c| c.lane() + 1).max().unwrap_or(0);
    let mut living = vec![[false; 2]; lane_count];
    for c in combatants.iter().filter(|c| c.is_alive()) {
        living[c.lane()][c.side().index()] = true;
    }
    if living.iter().any(|lane| lane[0] && lane[1]) {
        return Outcome::InProgress;
    }

    let allies = living.iter().filter(|lane| lane[Side::Ally.index()]).count();
    let enemies = living.iter().filter(|lane| lane[Side::Enemy.index()]).count();
    match allies.cmp(&enemies) {
        std::cmp::Ordering::Greater => Outcome::Win,
        std::cmp::Ordering::Less => Outcome::Lose,
        std::cmp::Ordering::Equal => Outcome::Tie,
    }
}
