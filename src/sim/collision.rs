//! Beam collision resolution
//!
//! Decides what a beam fired down a lane runs into. The letter typed in the
//! lane is checked first: consonants shield everything behind them, vowels
//! and empty slots are transparent.

use serde::{Deserialize, Serialize};

use super::combatant::{Combatant, WeaponState};
use super::word::WordBuffer;

/// What a fired beam hits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    /// Blocked by a consonant in the lane
    Consonant,
    /// Met the opposing beam head-on; both fizzle
    OtherBeam,
    /// Reached a living opponent, which is destroyed
    OtherCombatant,
    /// Nothing in the way and nobody to hit
    Empty,
}

impl Target {
    pub fn is_kill(self) -> bool {
        self == Target::OtherCombatant
    }
}

/// What the shooter sees of its opponent, captured before the tick mutates anything
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpponentView {
    pub weapon: WeaponState,
    pub alive: bool,
}

impl OpponentView {
    pub fn of(combatant: &Combatant) -> Self {
        Self {
            weapon: combatant.weapon(),
            alive: combatant.is_alive(),
        }
    }
}

const VOWELS: [char; 5] = ['a', 'e', 'i', 'o', 'u'];

/// Consonant shield rule: any letter that is not a vowel blocks
pub fn is_shield(ch: char) -> bool {
    !ch.is_whitespace() && !ch.to_lowercase().any(|lower| VOWELS.contains(&lower))
}

/// Classify a beam fired down `lane` at `opponent`. First matching rule wins.
pub fn project_target(word: &WordBuffer, lane: usize, opponent: OpponentView) -> Target {
    if word.letter_at(lane).is_some_and(is_shield) {
        Target::Consonant
    } else if opponent.weapon == WeaponState::Firing {
        Target::OtherBeam
    } else if opponent.alive {
        Target::OtherCombatant
    } else {
        Target::Empty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opponent(weapon: WeaponState, alive: bool) -> OpponentView {
        OpponentView { weapon, alive }
    }

    #[test]
    fn test_vowel_lets_beam_through() {
        let word = WordBuffer::new("cat");
        let target = project_target(&word, 1, opponent(WeaponState::Idle, true));
        assert_eq!(target, Target::OtherCombatant);
    }

    #[test]
    fn test_consonant_blocks_regardless_of_opponent() {
        let word = WordBuffer::new("cat");
        for weapon in [
            WeaponState::Idle,
            WeaponState::Charging,
            WeaponState::Firing,
            WeaponState::Retired,
        ] {
            for alive in [true, false] {
                assert_eq!(
                    project_target(&word, 0, opponent(weapon, alive)),
                    Target::Consonant
                );
            }
        }
    }

    #[test]
    fn test_past_end_of_word() {
        let word = WordBuffer::new("cat");
        assert_eq!(
            project_target(&word, 5, opponent(WeaponState::Firing, true)),
            Target::OtherBeam
        );
        assert_eq!(
            project_target(&word, 5, opponent(WeaponState::Retired, false)),
            Target::Empty
        );
    }

    #[test]
    fn test_charging_opponent_is_hit() {
        let word = WordBuffer::default();
        assert_eq!(
            project_target(&word, 0, opponent(WeaponState::Charging, true)),
            Target::OtherCombatant
        );
    }

    #[test]
    fn test_shield_rule() {
        assert!(is_shield('c'));
        assert!(is_shield('Y'));
        assert!(is_shield('7'));
        assert!(!is_shield('a'));
        assert!(!is_shield('E'));
        assert!(!is_shield('U'));
        assert!(!is_shield(' '));
    }
}
