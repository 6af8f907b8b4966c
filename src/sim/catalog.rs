//! Item catalog
//!
//! Static table of everything that can fall. Declaration order matters: the
//! spawner walks the cumulative weight distribution in this order.

use serde::{Deserialize, Serialize};

/// Catalog entry for a falling item
///
/// `Default` is the fallback when a weighted draw lands past the last bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ItemKind {
    #[default]
    Apple,
    Orange,
    Watermelon,
    GoldenApple,
    Bomb,
}

/// Number of kinds in the catalog
pub const KIND_COUNT: usize = 5;

/// All kinds, in catalog order
pub const CATALOG: [ItemKind; KIND_COUNT] = [
    ItemKind::Apple,
    ItemKind::Orange,
    ItemKind::Watermelon,
    ItemKind::GoldenApple,
    ItemKind::Bomb,
];

impl ItemKind {
    pub fn tag(&self) -> &'static str {
        match self {
            ItemKind::Apple => "apple",
            ItemKind::Orange => "orange",
            ItemKind::Watermelon => "watermelon",
            ItemKind::GoldenApple => "golden_apple",
            ItemKind::Bomb => "bomb",
        }
    }

    /// Display label for the presentation layer
    pub fn emoji(&self) -> &'static str {
        match self {
            ItemKind::Apple => "🍎",
            ItemKind::Orange => "🍊",
            ItemKind::Watermelon => "🍉",
            ItemKind::GoldenApple => "🌟",
            ItemKind::Bomb => "💣",
        }
    }

    /// Points awarded on catch (hazards award nothing)
    pub fn score(&self) -> u64 {
        match self {
            ItemKind::Apple => 10,
            ItemKind::Orange => 20,
            ItemKind::Watermelon => 50,
            ItemKind::GoldenApple => 100,
            ItemKind::Bomb => 0,
        }
    }

    pub fn is_hazard(&self) -> bool {
        matches!(self, ItemKind::Bomb)
    }

    pub fn is_fruit(&self) -> bool {
        !self.is_hazard()
    }

    /// Position in `CATALOG`
    pub fn index(&self) -> usize {
        *self as usize
    }
}
