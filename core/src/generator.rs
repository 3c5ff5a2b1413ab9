use rand::Rng;

use crate::*;

/// Cells kept free of bombs around the first discovery: the cell itself and its eight neighbors.
pub const SAFE_ZONE_CELLS: CellCount = 9;

/// Random draws allowed per bomb still to place before falling back to a scan.
pub const RETRY_FACTOR: u64 = 32;

impl Minefield {
    /// Bombs a randomization would place on the current grid.
    ///
    /// Capped so that the safe zone always fits, which also makes it zero on boards smaller than the safe zone.
    pub fn bombs_to_place(&self) -> CellCount {
        let capacity = self.total_cells().saturating_sub(SAFE_ZONE_CELLS);
        self.target_bomb_count().min(capacity)
    }

    /// Places bombs at random, never within one cell of `safe_center`.
    ///
    /// Cells are drawn uniformly and rejected when they are inside the safe zone or already hold a bomb. If the draws
    /// run out before every bomb is placed, the remaining bombs go to the first eligible cells in row-major order.
    pub fn randomize(&mut self, safe_center: Coord2) {
        let attempts = u64::from(self.bombs_to_place()) * RETRY_FACTOR;
        self.randomize_with_attempts(safe_center, attempts);
    }

    fn randomize_with_attempts(&mut self, safe_center: Coord2, mut attempts: u64) {
        let mut remaining = self.bombs_to_place();
        if remaining == 0 {
            return;
        }

        let (width, height) = self.size();
        while remaining > 0 && attempts > 0 {
            attempts -= 1;
            let coords = (
                self.rng.random_range(0..width),
                self.rng.random_range(0..height),
            );
            if chebyshev(coords, safe_center) <= 1 {
                continue;
            }
            if self.plant_bomb(coords) {
                remaining -= 1;
            }
        }

        if remaining > 0 {
            log::warn!(
                "Random placement ran out of draws with {remaining} bombs left, filling by scan"
            );
            self.fill_by_scan(safe_center, remaining);
        }

        log::debug!(
            "Placed {} bombs on a {width}x{height} minefield around {safe_center:?}",
            self.bomb_count()
        );
    }

    /// Plants up to `remaining` bombs in the first cells outside the safe zone, row by row.
    fn fill_by_scan(&mut self, safe_center: Coord2, mut remaining: CellCount) {
        let (width, height) = self.size();
        'scan: for y in 0..height {
            for x in 0..width {
                if remaining == 0 {
                    break 'scan;
                }
                if chebyshev((x, y), safe_center) > 1 && self.plant_bomb((x, y)) {
                    remaining -= 1;
                }
            }
        }
    }
}
