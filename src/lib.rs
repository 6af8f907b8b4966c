//! Pose Catch - A pose-driven fruit catching arcade game
//!
//! Core modules:
//! - `sim`: Game engine (state machine, spawner, fall/resolution loop, events)
//! - `tuning`: Data-driven game balance

pub mod sim;
pub mod tuning;

pub use sim::{Engine, GameEvent, GamePhase, GameState, Zone};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Misses allowed before the run ends
    pub const MAX_MISSES: u32 = 3;
    /// Highest level; later levels reuse its config
    pub const MAX_LEVEL: u32 = 5;

    /// Wall-clock time between level-ups (ms)
    pub const LEVEL_UP_INTERVAL_MS: u64 = 20_000;

    /// Spawn delay range, min inclusive, max exclusive (ms)
    pub const SPAWN_DELAY_MIN_MS: u64 = 1500;
    pub const SPAWN_DELAY_MAX_MS: u64 = 2500;

    /// One-time combo bonuses: (combo reached, bonus points)
    pub const COMBO_BONUSES: [(u32, u64); 2] = [(5, 50), (10, 100)];
}
