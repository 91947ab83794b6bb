use serde::{Deserialize, Serialize};

/// Options for a single game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Write one trace line per turn event to stderr.
    pub verbose: bool,
    /// Contract:
    /// - `None`: a player is asked again after every invalid action, forever.
    /// - `Some(n)`: the `n + 1`-th consecutive invalid action by the same
    ///   player aborts the game with `Error::TooManyInvalidActions`.
    pub max_invalid_attempts: Option<u32>,
}

impl GameConfig {
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn max_invalid_attempts(mut self, attempts: u32) -> Self {
        self.max_invalid_attempts = Some(attempts);
        self
    }
}
