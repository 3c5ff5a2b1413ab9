//! Game session and settings built around the [`mikesweeper_core::Minefield`] engine.
//!
//! The engine only moves cells between states; this crate decides when a game is lost or won, keeps the clock and the
//! HUD counters, and loads or saves the player's settings.

pub use error::*;
pub use game::*;
pub use settings::*;

mod error;
mod game;
mod settings;
