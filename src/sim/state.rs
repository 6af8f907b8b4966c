//! Game state and core simulation types
//!
//! Everything one session owns lives here. A fresh `GameState` is built on
//! every start; nothing carries over between sessions.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::catalog::ItemKind;

/// Horizontal lane, used for both item placement and the basket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Zone {
    Left,
    #[default]
    Center,
    Right,
}

impl Zone {
    pub const ALL: [Zone; 3] = [Zone::Left, Zone::Center, Zone::Right];

    pub fn as_str(&self) -> &'static str {
        match self {
            Zone::Left => "LEFT",
            Zone::Center => "CENTER",
            Zone::Right => "RIGHT",
        }
    }

    /// Map a classifier label to a zone. Anything else is `None`.
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "left" => Some(Zone::Left),
            "center" => Some(Zone::Center),
            "right" => Some(Zone::Right),
            _ => None,
        }
    }
}

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Before the first start, or after a stop
    #[default]
    Idle,
    /// Accepting input, spawning and ticking
    Active,
    /// Run ended; only a restart leaves this phase
    Ended,
}

/// An item in the air. Never mutated after creation; progress is derived from time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallingItem {
    pub id: u32,
    pub kind: ItemKind,
    pub zone: Zone,
    /// Engine clock at creation (ms)
    pub created_at_ms: u64,
    /// Fall duration of the level active at creation
    pub spawn_fall_ms: u64,
}

impl FallingItem {
    /// Fraction of the fall completed at `now_ms` for a given duration
    pub fn progress(&self, now_ms: u64, fall_duration_ms: u64) -> f64 {
        let elapsed = now_ms.saturating_sub(self.created_at_ms);
        elapsed as f64 / fall_duration_ms.max(1) as f64
    }
}

/// RNG state wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Complete state of one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    pub score: u64,
    /// 1..=MAX_LEVEL, never decreases within a session
    pub level: u32,
    pub miss_count: u32,
    pub max_misses: u32,
    /// Consecutive fruit catches
    pub combo: u32,
    pub fruits_caught: u32,
    pub basket: Zone,
    /// Active items in creation order
    pub items: Vec<FallingItem>,
    /// Engine clock when the session started
    pub started_at_ms: u64,
    /// Next item ID
    next_id: u32,
}

impl GameState {
    /// Create a fresh, inactive session state
    pub fn new(max_misses: u32) -> Self {
        Self {
            phase: GamePhase::Idle,
            score: 0,
            level: 1,
            miss_count: 0,
            max_misses,
            combo: 0,
            fruits_caught: 0,
            basket: Zone::Center,
            items: Vec::new(),
            started_at_ms: 0,
            next_id: 1,
        }
    }

    /// Allocate a new item ID
    pub fn next_item_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_active(&self) -> bool {
        self.phase == GamePhase::Active
    }

    pub fn item(&self, id: u32) -> Option<&FallingItem> {
        self.items.iter().find(|i| i.id == id)
    }
}
