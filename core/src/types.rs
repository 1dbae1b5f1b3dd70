/// Single axis value used for board width, height, and positions.
pub type Coord = u8;

/// Area-sized count used for mine and tile totals.
pub type TileCount = u16;

/// Grid position as `(x, y)`.
pub type Coord2 = (Coord, Coord);

/// Converts engine coordinates into `ndarray` index form.
pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn total_tiles(width: Coord, height: Coord) -> TileCount {
    (width as TileCount).saturating_mul(height as TileCount)
}

const DELTAS: [(i16, i16); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Yields the up-to-8 grid-adjacent positions of `center` (Chebyshev distance
/// 1), clipped to `bounds` with no wraparound.
pub fn neighbors(center: Coord2, bounds: Coord2) -> NeighborIter {
    NeighborIter {
        center,
        bounds,
        next: 0,
    }
}

#[derive(Copy, Clone, Debug)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    next: usize,
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next < DELTAS.len() {
            let (dx, dy) = DELTAS[self.next];
            self.next += 1;

            let x = i16::from(self.center.0) + dx;
            let y = i16::from(self.center.1) + dy;
            if (0..i16::from(self.bounds.0)).contains(&x)
                && (0..i16::from(self.bounds.1)).contains(&y)
            {
                return Some((x as Coord, y as Coord));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_has_eight_neighbors() {
        let all: Vec<Coord2> = neighbors((1, 1), (3, 3)).collect();
        assert_eq!(all.len(), 8);
        assert!(!all.contains(&(1, 1)));
    }

    #[test]
    fn corner_is_clipped_to_three() {
        let all: Vec<Coord2> = neighbors((0, 0), (3, 3)).collect();
        assert_eq!(all, vec![(1, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn edge_does_not_wrap() {
        let all: Vec<Coord2> = neighbors((2, 1), (3, 3)).collect();
        assert_eq!(all.len(), 5);
        assert!(all.iter().all(|&(x, _)| x >= 1));
    }
}
