//! Laser Lanes - typing-driven lane combat
//!
//! Two lines of combatants trade laser fire down fixed lanes. Letters of the
//! word the player is typing sit in the lanes: consonants block beams, vowels
//! let them through.
//!
//! Core modules:
//! - `sim`: Deterministic combat engine (weapon cycle, collisions, scheduling, outcome)
//! - `settings`: Match timing and audio preferences
//! - `audio`: Sound cues for engine events
//! - `web`: Browser binding (wasm32 only)

pub mod audio;
pub mod error;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::{EngineError, Result};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Lanes per side (columns on screen)
    pub const DEFAULT_LANE_COUNT: usize = 7;
    /// Scheduler tick interval
    pub const TICK_INTERVAL_MS: u64 = 3000;
    /// Post-fire delay before a beam resolves; must stay below the tick interval
    pub const POST_FIRE_DELAY_MS: u64 = 1000;
    /// Longest stretch of host time a single `advance` call will simulate
    pub const MAX_CATCH_UP_MS: u64 = 10_000;
    /// Max ticks per `advance` call; any backlog beyond this is dropped
    pub const MAX_TICKS_PER_ADVANCE: u32 = 4;
}
