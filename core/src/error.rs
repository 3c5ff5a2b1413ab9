use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates ({0}, {1})")]
    InvalidCoords(crate::Coord, crate::Coord),
}

pub type Result<T> = core::result::Result<T, GameError>;
