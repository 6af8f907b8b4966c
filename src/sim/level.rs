//! Level schedule and spawn weight brackets

use super::catalog::KIND_COUNT;
use crate::consts::MAX_LEVEL;

/// Per-level difficulty
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelConfig {
    pub level: u32,
    /// Time for an item to fall from spawn to resolution
    pub fall_duration_ms: u64,
    /// Chance that a spawned item is a hazard (0..1)
    pub hazard_probability: f64,
}

const fn entry(level: u32, fall_duration_ms: u64, hazard_probability: f64) -> LevelConfig {
    LevelConfig {
        level,
        fall_duration_ms,
        hazard_probability,
    }
}

const LEVELS: [LevelConfig; MAX_LEVEL as usize] = [
    entry(1, 4000, 0.10),
    entry(2, 3500, 0.10),
    entry(3, 3000, 0.15),
    entry(4, 2500, 0.15),
    entry(5, 2000, 0.20),
];

/// Look up a level's config. Level 0 reads as 1, levels past the cap reuse the last entry.
pub fn level_config(level: u32) -> LevelConfig {
    let idx = level.clamp(1, MAX_LEVEL) as usize - 1;
    LEVELS[idx]
}

/// Spawn weights per catalog kind, in catalog order
pub type KindWeights = [f64; KIND_COUNT];

//                       apple orange melon golden bomb
const EARLY: KindWeights = [0.45, 0.25, 0.15, 0.05, 0.10]; // levels 1-2
const MIDDLE: KindWeights = [0.35, 0.25, 0.15, 0.10, 0.15]; // levels 3-4
const LATE: KindWeights = [0.30, 0.20, 0.15, 0.15, 0.20]; // level 5+

/// Kind weights for the bracket containing `level`
pub fn kind_weights(level: u32) -> &'static KindWeights {
    match level {
        0..=2 => &EARLY,
        3..=4 => &MIDDLE,
        _ => &LATE,
    }
}
