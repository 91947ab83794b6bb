//! Error types for the engine.
//!
//! Every variant is fatal: it stops the game loop and surfaces to the caller
//! of `step`/`play`. Illegal placements and passes are not errors, they are
//! handled inside the turn state machine.

use thiserror::Error;

use crate::types::Player;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    #[error("cell ({row}, {col}) is out of bounds (must be 0-7)")]
    OutOfBounds { row: usize, col: usize },

    #[error("action ({row}, {col}) is outside the board")]
    InvalidCoordinate { row: i32, col: i32 },

    #[error("malformed action: {0}")]
    InvalidActionType(String),

    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("invalid board: {0}")]
    InvalidBoard(String),

    #[error("invalid player index {0} (expected 0 or 1)")]
    InvalidPlayer(u8),

    #[error("game is already over")]
    GameOver,

    #[error("{player} made {attempts} invalid attempts in a row")]
    TooManyInvalidActions { player: Player, attempts: u32 },

    #[error("{player} callback failed: {message}")]
    Callback { player: Player, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
