use ndarray::Array2;

/// Single coordinate axis used for board width, height, and positions.
///
/// Signed so that pointer mappings left of or above the board stay representable; they are simply out of bounds.
pub type Coord = i32;

/// Count type used for bomb, flag and cell counts.
pub type CellCount = u32;

/// Two-dimensional coordinates `(x, y)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    /// Callers must have bounds-checked `self`, negative values would wrap.
    fn to_nd_index(self) -> Self::Output {
        [self.0 as usize, self.1 as usize]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = if a < 0 { 0 } else { a as CellCount };
    let b = if b < 0 { 0 } else { b as CellCount };
    a.saturating_mul(b)
}

/// Chebyshev distance between two coordinates.
pub const fn chebyshev((ax, ay): Coord2, (bx, by): Coord2) -> Coord {
    let dx = (ax - bx).abs();
    let dy = (ay - by).abs();
    if dx > dy { dx } else { dy }
}

pub trait NeighborIterExt {
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter;
}

impl<T> NeighborIterExt for Array2<T> {
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter {
        let (width, height) = self.dim();
        let bounds = (
            Coord::try_from(width).unwrap_or(Coord::MAX),
            Coord::try_from(height).unwrap_or(Coord::MAX),
        );
        NeighborIter::new(index, bounds)
    }
}

// Row-major: the `y - 1` row first, then the centre row, then `y + 1`.
const DISPLACEMENTS: [(Coord, Coord); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
fn apply_delta(coords: Coord2, delta: Coord2, bounds: Coord2) -> Option<Coord2> {
    let (x, y) = coords;
    let (dx, dy) = delta;
    let (max_x, max_y) = bounds;

    let next_x = x.checked_add(dx)?;
    if next_x < 0 || next_x >= max_x {
        return None;
    }

    let next_y = y.checked_add(dy)?;
    if next_y < 0 || next_y >= max_y {
        return None;
    }

    Some((next_x, next_y))
}

/// Iterates the up-to-eight in-bounds neighbors of a cell, never the cell itself.
#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    index: u8,
}

impl NeighborIter {
    pub fn new(center: Coord2, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if usize::from(self.index) >= DISPLACEMENTS.len() {
                return None;
            }

            let next_item =
                apply_delta(self.center, DISPLACEMENTS[self.index as usize], self.bounds);
            self.index += 1;

            if next_item.is_some() {
                return next_item;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn neighbors_are_row_major_and_skip_center() {
        let neighbors: Vec<_> = NeighborIter::new((1, 1), (3, 3)).collect();

        assert_eq!(
            neighbors,
            [(0, 0), (1, 0), (2, 0), (0, 1), (2, 1), (0, 2), (1, 2), (2, 2)]
        );
    }

    #[test]
    fn neighbors_are_clipped_at_corners() {
        let neighbors: Vec<_> = NeighborIter::new((0, 0), (3, 3)).collect();

        assert_eq!(neighbors, [(1, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn neighbors_of_out_of_bounds_center_only_yield_in_bounds_cells() {
        let neighbors: Vec<_> = NeighborIter::new((-1, -1), (3, 3)).collect();

        assert_eq!(neighbors, [(0, 0)]);
    }

    #[test]
    fn mult_treats_negative_dimensions_as_empty() {
        assert_eq!(mult(-3, 4), 0);
        assert_eq!(mult(10, 10), 100);
    }

    #[test]
    fn chebyshev_takes_the_larger_axis() {
        assert_eq!(chebyshev((0, 0), (1, 1)), 1);
        assert_eq!(chebyshev((0, 0), (2, 1)), 2);
        assert_eq!(chebyshev((4, 4), (4, 4)), 0);
    }
}
