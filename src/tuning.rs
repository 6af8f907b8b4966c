//! Data-driven game balance
//!
//! Defaults reproduce the stock game. Hosts may load overrides from JSON;
//! missing fields keep their defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Balance knobs for a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Time between level-ups while active
    pub level_up_interval_ms: u64,
    /// Spawn delay is drawn uniformly from [min, max)
    pub spawn_delay_min_ms: u64,
    pub spawn_delay_max_ms: u64,
    /// Misses that end the run
    pub max_misses: u32,
    /// One-time bonuses as (combo reached, points)
    pub combo_bonuses: Vec<(u32, u64)>,
    /// Arm the spawner on start. When false, items only enter through `Engine::spawn_item`.
    pub autospawn: bool,
    /// Resolve items against the fall duration captured at spawn instead of
    /// the current level's duration
    pub freeze_fall_duration: bool,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            level_up_interval_ms: LEVEL_UP_INTERVAL_MS,
            spawn_delay_min_ms: SPAWN_DELAY_MIN_MS,
            spawn_delay_max_ms: SPAWN_DELAY_MAX_MS,
            max_misses: MAX_MISSES,
            combo_bonuses: COMBO_BONUSES.to_vec(),
            autospawn: true,
            freeze_fall_duration: false,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        if self.level_up_interval_ms == 0 {
            return Err(invalid("level_up_interval_ms must be positive"));
        }
        if self.spawn_delay_min_ms >= self.spawn_delay_max_ms {
            let (min, max) = (self.spawn_delay_min_ms, self.spawn_delay_max_ms);
            let msg = format!("spawn delay range [{min}, {max}) is empty");
            return Err(invalid(msg));
        }
        if self.max_misses == 0 {
            return Err(invalid("max_misses must be at least 1"));
        }
        if self.combo_bonuses.iter().any(|&(combo, _)| combo == 0) {
            return Err(invalid("combo bonus thresholds start at 1"));
        }
        Ok(())
    }

    /// Bonus for reaching exactly `combo`, if any
    pub fn combo_bonus(&self, combo: u32) -> u64 {
        self.combo_bonuses
            .iter()
            .filter(|&&(at, _)| at == combo)
            .map(|&(_, bonus)| bonus)
            .sum()
    }
}

fn invalid(msg: impl Into<String>) -> TuningError {
    TuningError::Invalid(msg.into())
}
