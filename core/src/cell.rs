use serde::{Deserialize, Serialize};

/// State of a single grid position.
///
/// Handed out by value, so a copy can never be used to modify the minefield.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Whether this cell holds a bomb.
    pub bomb: bool,
    /// Whether the player has marked this cell. Never set on a discovered cell.
    pub flagged: bool,
    /// Number of bombs among the in-bounds 8-neighborhood, excluding the cell itself.
    pub nearby_bombs: u8,
    /// Whether the cell has been revealed. Only a full reset clears it again.
    pub discovered: bool,
}

impl Cell {
    /// A safe cell with no adjacent bombs, the seed of a flood fill.
    pub const fn is_empty(self) -> bool {
        !self.bomb && self.nearby_bombs == 0
    }
}
