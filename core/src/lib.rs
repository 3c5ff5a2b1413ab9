//! Minefield engine for a classic Minesweeper game.
//!
//! The engine only tracks state: bomb placement, flags, discovery with flood fill and lazy randomization on the first
//! discovery. Deciding when a game is won or lost is left to the caller.

#![no_std]

extern crate alloc;

pub use cell::*;
pub use error::*;
pub use generator::*;
pub use minefield::*;
pub use types::*;

mod cell;
mod error;
mod generator;
mod minefield;
mod types;
