use alloc::vec::Vec;
use ndarray::Array2;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::*;

/// A grid of cells that may hold bombs, together with the bookkeeping counters of a single game.
///
/// Every coordinate-taking operation tolerates out-of-bounds input by doing nothing and returning `false` (or zero),
/// so positions produced by [`Minefield::position_to_index`] can be passed straight through.
#[derive(Clone, Debug)]
pub struct Minefield {
    grid: Array2<Cell>,
    discovered_count: CellCount,
    bomb_count: CellCount,
    flag_count: CellCount,
    target_bomb_count: CellCount,
    origin: Coord2,
    tile_size: Coord,
    pub(crate) rng: SmallRng,
}

impl Minefield {
    /// Creates an empty `0 × 0` minefield whose bomb layouts are drawn from `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            grid: Array2::default((0, 0)),
            discovered_count: 0,
            bomb_count: 0,
            flag_count: 0,
            target_bomb_count: 0,
            origin: (0, 0),
            tile_size: 1,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Replaces the random source used by the next randomization.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = SmallRng::seed_from_u64(seed);
    }

    /// Replaces the grid with `width × height` default cells and zeroes all counters.
    pub fn resize(&mut self, width: Coord, height: Coord) {
        if width < 0 || height < 0 {
            log::warn!("Negative minefield size {width}x{height}, clamping to zero");
        }
        let width = width.max(0) as usize;
        let height = height.max(0) as usize;

        self.grid = Array2::default((width, height));
        self.discovered_count = 0;
        self.bomb_count = 0;
        self.flag_count = 0;
    }

    /// Wipes every cell while keeping the current dimensions.
    pub fn reset(&mut self) {
        let (width, height) = self.size();
        self.resize(width, height);
    }

    pub fn width(&self) -> Coord {
        self.size().0
    }

    pub fn height(&self) -> Coord {
        self.size().1
    }

    pub fn size(&self) -> Coord2 {
        let (width, height) = self.grid.dim();
        (
            Coord::try_from(width).unwrap_or(Coord::MAX),
            Coord::try_from(height).unwrap_or(Coord::MAX),
        )
    }

    pub fn total_cells(&self) -> CellCount {
        let (width, height) = self.size();
        mult(width, height)
    }

    pub fn discovered_cells(&self) -> CellCount {
        self.discovered_count
    }

    pub fn bomb_count(&self) -> CellCount {
        self.bomb_count
    }

    pub fn flag_count(&self) -> CellCount {
        self.flag_count
    }

    /// Bombs the next randomization will try to place.
    pub fn target_bomb_count(&self) -> CellCount {
        self.target_bomb_count
    }

    pub fn set_target_bomb_count(&mut self, count: CellCount) {
        self.target_bomb_count = count;
    }

    /// Whether the first cell of this game has been discovered (and bombs have been placed).
    pub fn has_started(&self) -> bool {
        self.discovered_count != 0
    }

    /// Bombs minus flags, negative when the player has over-flagged.
    pub fn mines_left(&self) -> i64 {
        i64::from(self.bomb_count) - i64::from(self.flag_count)
    }

    pub fn is_in_bounds(&self, (x, y): Coord2) -> bool {
        let (width, height) = self.size();
        x >= 0 && x < width && y >= 0 && y < height
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.is_in_bounds(coords) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords(coords.0, coords.1))
        }
    }

    /// Snapshot of the cell at `coords`.
    pub fn cell_at(&self, coords: Coord2) -> Result<Cell> {
        let coords = self.validate_coords(coords)?;
        Ok(self.grid[coords.to_nd_index()])
    }

    fn cell(&self, coords: Coord2) -> Option<&Cell> {
        if self.is_in_bounds(coords) {
            self.grid.get(coords.to_nd_index())
        } else {
            None
        }
    }

    fn cell_mut(&mut self, coords: Coord2) -> Option<&mut Cell> {
        if self.is_in_bounds(coords) {
            self.grid.get_mut(coords.to_nd_index())
        } else {
            None
        }
    }

    /// Every cell with its coordinates, row by row.
    pub fn iter_cells(&self) -> impl Iterator<Item = (Coord2, Cell)> + '_ {
        let (width, height) = self.size();
        (0..height).flat_map(move |y| {
            (0..width).map(move |x| ((x, y), self.grid[(x, y).to_nd_index()]))
        })
    }

    /// Places a bomb and bumps the counters of its neighbors.
    ///
    /// Returns `false` when out of bounds or when the cell already holds a bomb.
    pub fn plant_bomb(&mut self, coords: Coord2) -> bool {
        let Some(cell) = self.cell_mut(coords) else {
            return false;
        };
        if cell.bomb {
            return false;
        }

        cell.bomb = true;
        self.bomb_count += 1;
        for pos in self.neighbors(coords) {
            self.grid[pos.to_nd_index()].nearby_bombs += 1;
        }
        true
    }

    /// True for in-bounds undiscovered cells, flagged or not.
    pub fn can_flag(&self, coords: Coord2) -> bool {
        self.cell(coords).is_some_and(|cell| !cell.discovered)
    }

    /// Flips the flag on an undiscovered cell. Returns whether the flag changed.
    pub fn toggle_flag(&mut self, coords: Coord2) -> bool {
        if !self.can_flag(coords) {
            return false;
        }

        let cell = &mut self.grid[coords.to_nd_index()];
        cell.flagged = !cell.flagged;
        if cell.flagged {
            self.flag_count += 1;
        } else {
            self.flag_count -= 1;
        }
        true
    }

    /// True for in-bounds cells that are neither discovered nor flagged.
    pub fn can_discover(&self, coords: Coord2) -> bool {
        self.cell(coords)
            .is_some_and(|cell| !cell.discovered && !cell.flagged)
    }

    /// Reveals a cell, flood filling across empty cells.
    ///
    /// The very first discovery of a game randomizes the bombs beforehand, keeping `coords` and its neighbors clear.
    /// Returns `true` when the cell was discovered; whether it was a bomb has to be checked with
    /// [`Minefield::is_bomb`].
    pub fn discover(&mut self, coords: Coord2) -> bool {
        if !self.can_discover(coords) {
            return false;
        }

        if self.discovered_count == 0 {
            log::debug!("First discovery at {coords:?}, placing bombs");
            self.randomize(coords);
        }

        if self.mark_discovered(coords) {
            let before = self.discovered_count;
            let mut to_visit = Vec::from([coords]);

            while let Some(visit_coords) = to_visit.pop() {
                for pos in self.neighbors(visit_coords) {
                    if self.can_discover(pos) && self.mark_discovered(pos) {
                        to_visit.push(pos);
                    }
                }
            }

            log::trace!(
                "Flood fill from {coords:?} opened {} more cells",
                self.discovered_count - before
            );
        }
        true
    }

    /// Marks one cell discovered, returning whether it is empty and the fill should spread from it.
    fn mark_discovered(&mut self, coords: Coord2) -> bool {
        let cell = &mut self.grid[coords.to_nd_index()];
        cell.discovered = true;
        self.discovered_count += 1;
        cell.is_empty()
    }

    pub fn is_bomb(&self, coords: Coord2) -> bool {
        self.cell(coords).is_some_and(|cell| cell.bomb)
    }

    pub fn is_discovered(&self, coords: Coord2) -> bool {
        self.cell(coords).is_some_and(|cell| cell.discovered)
    }

    pub fn is_flagged(&self, coords: Coord2) -> bool {
        self.cell(coords).is_some_and(|cell| cell.flagged)
    }

    /// Flagged cells among the in-bounds neighbors.
    pub fn flags_nearby(&self, coords: Coord2) -> u8 {
        let mut count = 0;
        self.for_each_adjacent_cell(coords, |pos| {
            if self.grid[pos.to_nd_index()].flagged {
                count += 1;
            }
        });
        count
    }

    /// The precomputed bomb counter of the cell, zero when out of bounds.
    pub fn bombs_nearby(&self, coords: Coord2) -> u8 {
        self.cell(coords).map_or(0, |cell| cell.nearby_bombs)
    }

    /// In-bounds neighbors of `coords` in row-major order.
    ///
    /// The iterator does not borrow the minefield, so it can drive mutations such as chording.
    pub fn neighbors(&self, coords: Coord2) -> NeighborIter {
        self.grid.iter_neighbors(coords)
    }

    pub fn for_each_adjacent_cell(&self, coords: Coord2, visit: impl FnMut(Coord2)) {
        self.neighbors(coords).for_each(visit);
    }

    /// Whether chording is allowed: the cell is discovered and as many neighbors are flagged as there are bombs.
    pub fn can_chord(&self, coords: Coord2) -> bool {
        self.is_discovered(coords) && self.flags_nearby(coords) == self.bombs_nearby(coords)
    }

    /// Discovers every neighbor of a chordable cell. Returns whether anything was discovered.
    pub fn chord(&mut self, coords: Coord2) -> bool {
        if !self.can_chord(coords) {
            return false;
        }

        let mut discovered = false;
        for pos in self.neighbors(coords) {
            discovered |= self.discover(pos);
        }
        discovered
    }

    /// Display offset of the grid, used by [`Minefield::position_to_index`].
    pub fn origin(&self) -> Coord2 {
        self.origin
    }

    pub fn set_origin(&mut self, origin: Coord2) {
        self.origin = origin;
    }

    pub fn tile_size(&self) -> Coord {
        self.tile_size
    }

    pub fn set_tile_size(&mut self, tile_size: Coord) {
        if tile_size < 1 {
            log::warn!("Tile size {tile_size} is not positive, using 1");
        }
        self.tile_size = tile_size.max(1);
    }

    /// Maps a display position to grid coordinates. The result may well be out of bounds.
    pub fn position_to_index(&self, (px, py): Coord2) -> Coord2 {
        let (ox, oy) = self.origin;
        (
            px.saturating_sub(ox).div_euclid(self.tile_size),
            py.saturating_sub(oy).div_euclid(self.tile_size),
        )
    }
}

impl Default for Minefield {
    fn default() -> Self {
        Self::new(0)
    }
}
