use std::fmt;

use crate::board::Board;
use crate::capture::{self, mask_to_positions};
use crate::config::GameConfig;
use crate::error::{Error, Result};
use crate::score;
use crate::types::{Action, GameResult, Player, Position, Termination, TrajectoryEntry};
use crate::validator;

/// What a policy wants to do on its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Place(Action),
    Pass,
}

/// Chooses the next action for one player.
///
/// `previous_invalid` is `true` when this player's last answer was rejected
/// and it is being asked again for the same turn.
pub trait Policy {
    fn decide(&mut self, board: &Board, player: Player, previous_invalid: bool) -> Result<Decision>;
}

impl<F> Policy for F
where
    F: FnMut(&Board, Player, bool) -> Decision,
{
    fn decide(&mut self, board: &Board, player: Player, previous_invalid: bool) -> Result<Decision> {
        Ok(self(board, player, previous_invalid))
    }
}

/// Receives one player's trajectory and signed score once the game ends.
pub trait RewardCollector {
    fn collect(&mut self, trajectory: &[TrajectoryEntry], score: i32) -> Result<()>;
}

impl<F> RewardCollector for F
where
    F: FnMut(&[TrajectoryEntry], i32),
{
    fn collect(&mut self, trajectory: &[TrajectoryEntry], score: i32) -> Result<()> {
        self(trajectory, score);
        Ok(())
    }
}

/// Notified after every accepted move.
pub trait Renderer {
    fn render(&mut self, action: Position, player: Player) -> Result<()>;
}

impl<F> Renderer for F
where
    F: FnMut(Position, Player),
{
    fn render(&mut self, action: Position, player: Player) -> Result<()> {
        self(action, player);
        Ok(())
    }
}

/// Plays the first legal placement in row-major order, or passes.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstLegalMove;

impl Policy for FirstLegalMove {
    fn decide(&mut self, board: &Board, player: Player, _previous_invalid: bool) -> Result<Decision> {
        Ok(validator::legal_moves(board, player)
            .first()
            .map_or(Decision::Pass, |&pos| Decision::Place(pos.into())))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Target occupied, or no line captures.
    IllegalPlacement,
    /// The policy passed while a legal placement existed.
    UnjustifiedPass,
}

/// Result of a single [`GameLoop::step`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    Moved {
        player: Player,
        position: Position,
        flipped: Vec<Position>,
    },
    /// The player had no legal placement; the turn went to the opponent.
    Passed { player: Player },
    /// The action was refused; the same player moves again.
    Rejected { player: Player, reason: Rejection },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GameState {
    InProgress,
    Ended(Termination),
    Aborted,
}

type BoxedPolicy<'a> = Box<dyn Policy + 'a>;
type BoxedReward<'a> = Box<dyn RewardCollector + 'a>;
type BoxedRenderer<'a> = Box<dyn Renderer + 'a>;

/// Turn state machine for one game.
///
/// Owns the board and both trajectories; collaborators only ever see shared
/// references or copies.
pub struct GameLoop<'a> {
    board: Board,
    current: Player,
    state: GameState,
    previous_invalid: bool,
    invalid_attempts: u32,
    consecutive_passes: u8,
    trajectories: [Vec<TrajectoryEntry>; 2],
    policies: [BoxedPolicy<'a>; 2],
    rewards: [BoxedReward<'a>; 2],
    renderers: Vec<BoxedRenderer<'a>>,
    config: GameConfig,
}

impl<'a> GameLoop<'a> {
    /// Starts a game from the initial position with black to move.
    /// Policies and rewards are indexed by player (black first).
    pub fn new(
        policies: [BoxedPolicy<'a>; 2],
        rewards: [BoxedReward<'a>; 2],
        renderers: Vec<BoxedRenderer<'a>>,
        config: GameConfig,
    ) -> Self {
        Self::with_position(Board::new(), Player::Black, policies, rewards, renderers, config)
    }

    fn with_position(
        board: Board,
        first_player: Player,
        policies: [BoxedPolicy<'a>; 2],
        rewards: [BoxedReward<'a>; 2],
        renderers: Vec<BoxedRenderer<'a>>,
        config: GameConfig,
    ) -> Self {
        Self {
            board,
            current: first_player,
            state: GameState::InProgress,
            previous_invalid: false,
            invalid_attempts: 0,
            consecutive_passes: 0,
            trajectories: [Vec::new(), Vec::new()],
            policies,
            rewards,
            renderers,
            config,
        }
    }

    pub fn builder() -> GameLoopBuilder<'a> {
        GameLoopBuilder::default()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Player {
        self.current
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.state, GameState::Ended(_))
    }

    /// `true` once a fatal error stopped the game.
    pub fn is_aborted(&self) -> bool {
        self.state == GameState::Aborted
    }

    pub fn previous_action_invalid(&self) -> bool {
        self.previous_invalid
    }

    /// Moves accepted so far for `player`, oldest first.
    pub fn trajectory(&self, player: Player) -> &[TrajectoryEntry] {
        &self.trajectories[player.index()]
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn result(&self) -> GameResult {
        let termination = match self.state {
            GameState::Ended(termination) => Some(termination),
            GameState::InProgress | GameState::Aborted => None,
        };
        score::result(&self.board, termination)
    }

    /// Runs turns until the game ends. Rewards have been delivered when this
    /// returns `Ok`.
    pub fn play(&mut self) -> Result<GameResult> {
        while !self.is_game_over() {
            self.step()?;
        }
        Ok(self.result())
    }

    /// Plays one turn.
    ///
    /// Any error is fatal: the game is marked aborted and later calls fail
    /// with [`Error::GameOver`].
    pub fn step(&mut self) -> Result<TurnOutcome> {
        if self.state != GameState::InProgress {
            return Err(Error::GameOver);
        }

        let outcome = self.advance();
        if let Err(err) = &outcome {
            self.trace(format_args!("game aborted: {err}"));
            self.state = GameState::Aborted;
        }
        outcome
    }

    fn advance(&mut self) -> Result<TurnOutcome> {
        let player = self.current;

        if !validator::has_legal_move(&self.board, player) {
            return self.forced_pass(player);
        }

        let decision =
            self.policies[player.index()].decide(&self.board, player, self.previous_invalid)?;
        let position = match decision {
            Decision::Pass => return self.reject(player, Rejection::UnjustifiedPass),
            Decision::Place(action) => action.position()?,
        };

        let directions = validator::find_capturing_directions(&self.board, player, position);
        if directions.is_empty() {
            return self.reject(player, Rejection::IllegalPlacement);
        }

        self.trajectories[player.index()].push(TrajectoryEntry {
            action: position,
            board: self.board,
        });
        let flips = capture::apply(&mut self.board, player, position, directions);
        self.trace(format_args!(
            "{player} plays {position}, flips {}, board {:08x}",
            flips.count_ones(),
            self.board.fingerprint()
        ));

        for renderer in &mut self.renderers {
            renderer.render(position, player)?;
        }

        self.current = player.opponent();
        self.previous_invalid = false;
        self.invalid_attempts = 0;
        self.consecutive_passes = 0;

        if self.board.is_full() {
            self.finish(Termination::BoardFull)?;
        }

        Ok(TurnOutcome::Moved {
            player,
            position,
            flipped: mask_to_positions(flips),
        })
    }

    fn forced_pass(&mut self, player: Player) -> Result<TurnOutcome> {
        self.trace(format_args!("{player} has no legal move and passes"));
        self.consecutive_passes += 1;
        self.current = player.opponent();
        self.previous_invalid = false;
        self.invalid_attempts = 0;

        if self.board.is_full() {
            self.finish(Termination::BoardFull)?;
        } else if self.consecutive_passes >= 2 {
            self.finish(Termination::Stalemate)?;
        }

        Ok(TurnOutcome::Passed { player })
    }

    fn reject(&mut self, player: Player, reason: Rejection) -> Result<TurnOutcome> {
        self.previous_invalid = true;
        self.invalid_attempts += 1;
        self.trace(format_args!(
            "{player} action rejected ({reason:?}), attempt {}",
            self.invalid_attempts
        ));

        if let Some(max) = self.config.max_invalid_attempts
            && self.invalid_attempts > max
        {
            return Err(Error::TooManyInvalidActions {
                player,
                attempts: self.invalid_attempts,
            });
        }

        Ok(TurnOutcome::Rejected { player, reason })
    }

    fn finish(&mut self, termination: Termination) -> Result<()> {
        self.state = GameState::Ended(termination);
        self.trace(format_args!(
            "game over ({termination:?}), score {}",
            score::evaluate(&self.board)
        ));

        for player in Player::ALL {
            let signed = score::score_for(&self.board, player);
            self.rewards[player.index()].collect(&self.trajectories[player.index()], signed)?;
        }
        Ok(())
    }

    fn trace(&self, args: fmt::Arguments<'_>) {
        if self.config.verbose {
            eprintln!("[othello] {args}");
        }
    }
}

/// Registration-style construction of a [`GameLoop`].
///
/// Exactly two policies and two rewards must be registered, black's first.
pub struct GameLoopBuilder<'a> {
    policies: Vec<BoxedPolicy<'a>>,
    rewards: Vec<BoxedReward<'a>>,
    renderers: Vec<BoxedRenderer<'a>>,
    config: GameConfig,
    board: Board,
    first_player: Player,
}

impl Default for GameLoopBuilder<'_> {
    fn default() -> Self {
        Self {
            policies: Vec::new(),
            rewards: Vec::new(),
            renderers: Vec::new(),
            config: GameConfig::default(),
            board: Board::new(),
            first_player: Player::Black,
        }
    }
}

impl<'a> GameLoopBuilder<'a> {
    pub fn policy(self, policy: impl Policy + 'a) -> Result<Self> {
        self.boxed_policy(Box::new(policy))
    }

    pub fn boxed_policy(mut self, policy: BoxedPolicy<'a>) -> Result<Self> {
        if self.policies.len() == 2 {
            return Err(Error::Configuration(
                "cannot register 3 or more policies".to_string(),
            ));
        }
        self.policies.push(policy);
        Ok(self)
    }

    pub fn reward(self, reward: impl RewardCollector + 'a) -> Result<Self> {
        self.boxed_reward(Box::new(reward))
    }

    pub fn boxed_reward(mut self, reward: BoxedReward<'a>) -> Result<Self> {
        if self.rewards.len() == 2 {
            return Err(Error::Configuration(
                "cannot register 3 or more rewards".to_string(),
            ));
        }
        self.rewards.push(reward);
        Ok(self)
    }

    pub fn renderer(self, renderer: impl Renderer + 'a) -> Self {
        self.boxed_renderer(Box::new(renderer))
    }

    pub fn boxed_renderer(mut self, renderer: BoxedRenderer<'a>) -> Self {
        self.renderers.push(renderer);
        self
    }

    pub fn config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    /// Starts from `board` instead of the initial position.
    pub fn board(mut self, board: Board) -> Self {
        self.board = board;
        self
    }

    pub fn first_player(mut self, player: Player) -> Self {
        self.first_player = player;
        self
    }

    pub fn build(self) -> Result<GameLoop<'a>> {
        let policies = exactly_two(self.policies, "policies")?;
        let rewards = exactly_two(self.rewards, "rewards")?;
        Ok(GameLoop::with_position(
            self.board,
            self.first_player,
            policies,
            rewards,
            self.renderers,
            self.config,
        ))
    }
}

fn exactly_two<T>(items: Vec<T>, what: &str) -> Result<[T; 2]> {
    items.try_into().map_err(|items: Vec<T>| {
        Error::Configuration(format!("expected 2 {what}, got {}", items.len()))
    })
}
