//! Randomized item selection for the spawner

use rand::Rng;

use super::catalog::{CATALOG, ItemKind};
use super::level::{KindWeights, kind_weights};
use super::state::Zone;
use crate::tuning::Tuning;

/// Walk the cumulative distribution in catalog order.
/// A roll left unassigned by rounding falls back to the default kind.
pub fn kind_for_roll(weights: &KindWeights, roll: f64) -> ItemKind {
    let mut cumulative = 0.0;
    for (kind, weight) in CATALOG.iter().zip(weights) {
        cumulative += weight;
        if roll < cumulative {
            return *kind;
        }
    }
    ItemKind::default()
}

/// Weighted draw from the bracket for `level`
pub fn pick_kind<R: Rng>(rng: &mut R, level: u32) -> ItemKind {
    let roll: f64 = rng.random();
    kind_for_roll(kind_weights(level), roll)
}

pub fn pick_zone<R: Rng>(rng: &mut R) -> Zone {
    Zone::ALL[rng.random_range(0..Zone::ALL.len())]
}

/// Delay until the next spawn, uniform over [min, max)
pub fn spawn_delay<R: Rng>(rng: &mut R, tuning: &Tuning) -> u64 {
    rng.random_range(tuning.spawn_delay_min_ms..tuning.spawn_delay_max_ms)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_roll_walks_catalog_order() {
        let weights = [0.45, 0.25, 0.15, 0.05, 0.10];
        assert_eq!(kind_for_roll(&weights, 0.0), ItemKind::Apple);
        assert_eq!(kind_for_roll(&weights, 0.44), ItemKind::Apple);
        assert_eq!(kind_for_roll(&weights, 0.46), ItemKind::Orange);
        assert_eq!(kind_for_roll(&weights, 0.86), ItemKind::GoldenApple);
        assert_eq!(kind_for_roll(&weights, 0.95), ItemKind::Bomb);
    }

    #[test]
    fn test_unassigned_roll_falls_back() {
        // Weights that fall short of 1.0
        let weights = [0.1, 0.1, 0.1, 0.1, 0.1];
        assert_eq!(kind_for_roll(&weights, 0.99), ItemKind::default());
    }

    #[test]
    fn test_delay_in_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        let tuning = Tuning::default();
        for _ in 0..1000 {
            let d = spawn_delay(&mut rng, &tuning);
            assert!((1500..2500).contains(&d));
        }
    }

    #[test]
    fn test_distribution_is_roughly_weighted() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut counts: HashMap<ItemKind, u32> = HashMap::new();
        let mut zones: HashMap<Zone, u32> = HashMap::new();
        let n = 20_000;
        for _ in 0..n {
            *counts.entry(pick_kind(&mut rng, 1)).or_default() += 1;
            *zones.entry(pick_zone(&mut rng)).or_default() += 1;
        }
        let bombs = counts[&ItemKind::Bomb] as f64 / n as f64;
        assert!((bombs - 0.10).abs() < 0.02, "bomb rate {bombs}");
        let apples = counts[&ItemKind::Apple] as f64 / n as f64;
        assert!((apples - 0.45).abs() < 0.02, "apple rate {apples}");
        for zone in Zone::ALL {
            let share = zones[&zone] as f64 / n as f64;
            assert!((share - 1.0 / 3.0).abs() < 0.02, "{zone:?} share {share}");
        }
    }
}
