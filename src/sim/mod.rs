//! Deterministic combat simulation
//!
//! All gameplay logic lives here:
//! - Seeded RNG only
//! - Time only moves when the host advances it
//! - Stable iteration order (arena order: ally lanes, then enemy lanes)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod combatant;
pub mod driver;
pub mod lane;
pub mod outcome;
pub mod pools;
pub mod state;
pub mod tick;
pub mod timers;
pub mod word;

pub use collision::{OpponentView, Target, is_shield, project_target};
pub use combatant::{Combatant, WeaponState};
pub use driver::MatchDriver;
pub use lane::{CombatantId, LaneRegistry, Side};
pub use outcome::{Outcome, compute_outcome};
pub use pools::{LanePools, Pool};
pub use state::{CombatantSnapshot, GameEvent, MatchState, Snapshot, create_match};
pub use tick::{run_timers, tick};
pub use timers::{BeamResolution, PendingBeam, TimerId, TimerQueue};
pub use word::WordBuffer;
