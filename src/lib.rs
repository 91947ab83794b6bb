//! Othello rules engine: board state, move legality, captures, and the turn
//! loop that drives two external policies to a scored result.

pub mod board;
pub mod capture;
pub mod config;
pub mod error;
pub mod game;
pub mod score;
pub mod types;
pub mod validator;
pub mod wasm;

pub use board::Board;
pub use config::GameConfig;
pub use error::{Error, Result};
pub use game::{
    Decision, FirstLegalMove, GameLoop, GameLoopBuilder, Policy, Rejection, Renderer,
    RewardCollector, TurnOutcome,
};
pub use types::{
    Action, CellState, Direction, DirectionSet, GameResult, Player, Position, Termination,
    TrajectoryEntry,
};
