use ndarray::Array2;
use rand::prelude::*;

use crate::types::{Coord2, TileCount, ToNdIndex};

/// Strategy for placing mines once the first tile has been clicked.
pub trait MinePlacer {
    /// Produces a mine mask for a board of `size` holding `mines` mines,
    /// leaving `safe` and its up-to-8 neighbors mine-free.
    fn place(&mut self, size: Coord2, mines: TileCount, safe: Coord2) -> Array2<bool>;
}

/// Uniform random placement, seeded for reproducibility.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RandomPlacer {
    seed: u64,
}

impl RandomPlacer {
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }
}

/// Whether `pos` is `safe` itself or one of its Chebyshev-1 neighbors.
fn in_safe_zone(pos: Coord2, safe: Coord2) -> bool {
    (i16::from(pos.0) - i16::from(safe.0)).abs() <= 1
        && (i16::from(pos.1) - i16::from(safe.1)).abs() <= 1
}

impl MinePlacer for RandomPlacer {
    fn place(&mut self, size: Coord2, mines: TileCount, safe: Coord2) -> Array2<bool> {
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut mask: Array2<bool> = Array2::default(size.to_nd_index());

        let mut candidates: Vec<Coord2> = Vec::with_capacity(mask.len());
        for x in 0..size.0 {
            for y in 0..size.1 {
                if !in_safe_zone((x, y), safe) {
                    candidates.push((x, y));
                }
            }
        }

        if usize::from(mines) > candidates.len() {
            log::warn!(
                "cannot fit {} mines outside the safe zone, placing {}",
                mines,
                candidates.len()
            );
        }

        for &pos in candidates.choose_multiple(&mut rng, usize::from(mines)) {
            mask[pos.to_nd_index()] = true;
        }

        log::debug!(
            "placed {} mines on a {}x{} board, safe zone around {:?}",
            mines,
            size.0,
            size.1,
            safe
        );
        mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mine_count(mask: &Array2<bool>) -> usize {
        mask.iter().filter(|&&m| m).count()
    }

    #[test]
    fn places_exact_mine_count() {
        for seed in 0..16 {
            let mask = RandomPlacer::new(seed).place((9, 9), 10, (4, 4));
            assert_eq!(mine_count(&mask), 10);
        }
    }

    #[test]
    fn safe_zone_stays_clear() {
        for seed in 0..16 {
            let mask = RandomPlacer::new(seed).place((5, 5), 16, (2, 2));
            assert_eq!(mine_count(&mask), 16);
            for x in 1..=3 {
                for y in 1..=3 {
                    assert!(!mask[[x, y]], "mine in safe zone at ({x}, {y})");
                }
            }
        }
    }

    #[test]
    fn safe_zone_is_clamped_at_the_corner() {
        let mask = RandomPlacer::new(7).place((4, 4), 12, (0, 0));
        assert_eq!(mine_count(&mask), 12);
        for x in 0..=1 {
            for y in 0..=1 {
                assert!(!mask[[x, y]]);
            }
        }
    }

    #[test]
    fn same_seed_gives_same_layout() {
        let a = RandomPlacer::new(42).place((8, 8), 12, (3, 3));
        let b = RandomPlacer::new(42).place((8, 8), 12, (3, 3));
        assert_eq!(a, b);
    }
}
