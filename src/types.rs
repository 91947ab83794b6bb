use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use crate::board::{BOARD_SIZE, Board, NUM_SQUARES};
use crate::error::{Error, Result};

/// One of the two players. `Black` is player 0 and moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    Black,
    White,
}

impl Player {
    pub const ALL: [Player; 2] = [Player::Black, Player::White];

    pub fn index(self) -> usize {
        match self {
            Player::Black => 0,
            Player::White => 1,
        }
    }

    pub fn from_index(index: u8) -> Result<Self> {
        match index {
            0 => Ok(Player::Black),
            1 => Ok(Player::White),
            other => Err(Error::InvalidPlayer(other)),
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Black => write!(f, "black"),
            Player::White => write!(f, "white"),
        }
    }
}

/// State of a single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum CellState {
    #[default]
    Empty,
    Owned(Player),
}

impl CellState {
    /// Wire encoding: 0=empty, 1=black, 2=white.
    pub fn code(self) -> u8 {
        match self {
            CellState::Empty => 0,
            CellState::Owned(Player::Black) => 1,
            CellState::Owned(Player::White) => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(CellState::Empty),
            1 => Some(CellState::Owned(Player::Black)),
            2 => Some(CellState::Owned(Player::White)),
            _ => None,
        }
    }

    pub fn owner(self) -> Option<Player> {
        match self {
            CellState::Empty => None,
            CellState::Owned(player) => Some(player),
        }
    }
}

/// A board coordinate. Always inside the 8x8 grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    row: u8,
    col: u8,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Option<Self> {
        if row < BOARD_SIZE && col < BOARD_SIZE {
            Some(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// Caller contract: `index < 64`.
    pub(crate) fn from_index(index: usize) -> Self {
        debug_assert!(index < NUM_SQUARES);
        Self {
            row: (index / BOARD_SIZE) as u8,
            col: (index % BOARD_SIZE) as u8,
        }
    }

    pub fn row(self) -> usize {
        self.row as usize
    }

    pub fn col(self) -> usize {
        self.col as usize
    }

    /// Row-major index in `0..64`.
    pub fn index(self) -> usize {
        self.row() * BOARD_SIZE + self.col()
    }

    /// The neighbouring cell in `direction`, or `None` past the edge.
    ///
    /// Every line walk on the board steps through this function, so no scan
    /// can index outside the grid.
    pub fn step(self, direction: Direction) -> Option<Self> {
        let row = self.row as i32 + direction.d_row as i32;
        let col = self.col as i32 + direction.d_col as i32;
        if in_bounds(row, col) {
            Some(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// All 64 positions in row-major order.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..NUM_SQUARES).map(Position::from_index)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A placement proposed by a policy. Unlike [`Position`] it may lie off the
/// board; [`Action::position`] is where that is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub row: i32,
    pub col: i32,
}

impl Action {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn position(self) -> Result<Position> {
        if in_bounds(self.row, self.col) {
            Ok(Position::from_index(
                self.row as usize * BOARD_SIZE + self.col as usize,
            ))
        } else {
            Err(Error::InvalidCoordinate {
                row: self.row,
                col: self.col,
            })
        }
    }
}

impl From<Position> for Action {
    fn from(position: Position) -> Self {
        Self::new(position.row() as i32, position.col() as i32)
    }
}

/// One of the 8 unit steps between neighbouring cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Direction {
    pub d_row: i8,
    pub d_col: i8,
}

impl Direction {
    pub const UP_LEFT: Direction = Direction::new(-1, -1);
    pub const UP: Direction = Direction::new(-1, 0);
    pub const UP_RIGHT: Direction = Direction::new(-1, 1);
    pub const LEFT: Direction = Direction::new(0, -1);
    pub const RIGHT: Direction = Direction::new(0, 1);
    pub const DOWN_LEFT: Direction = Direction::new(1, -1);
    pub const DOWN: Direction = Direction::new(1, 0);
    pub const DOWN_RIGHT: Direction = Direction::new(1, 1);

    pub const ALL: [Direction; 8] = [
        Direction::UP_LEFT,
        Direction::UP,
        Direction::UP_RIGHT,
        Direction::LEFT,
        Direction::RIGHT,
        Direction::DOWN_LEFT,
        Direction::DOWN,
        Direction::DOWN_RIGHT,
    ];

    const fn new(d_row: i8, d_col: i8) -> Self {
        Self { d_row, d_col }
    }

    /// Position of this direction in [`Direction::ALL`].
    fn ordinal(self) -> u8 {
        let cell = ((self.d_row + 1) * 3 + (self.d_col + 1)) as u8;
        // The centre (0, 0) is not a direction, so later cells shift down.
        if cell > 4 { cell - 1 } else { cell }
    }
}

/// A set of directions, one bit per entry of [`Direction::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirectionSet(u8);

impl DirectionSet {
    pub fn new() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, direction: Direction) {
        self.0 |= 1 << direction.ordinal();
    }

    pub fn contains(self, direction: Direction) -> bool {
        self.0 & (1 << direction.ordinal()) != 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Direction> {
        Direction::ALL
            .into_iter()
            .filter(move |&direction| self.contains(direction))
    }
}

impl FromIterator<Direction> for DirectionSet {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        let mut set = Self::new();
        for direction in iter {
            set.insert(direction);
        }
        set
    }
}

impl Serialize for DirectionSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// One accepted move as seen by the player who made it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrajectoryEntry {
    pub action: Position,
    /// Board the policy observed, before the move was applied.
    pub board: Board,
}

/// Why a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Termination {
    BoardFull,
    /// Neither player has a legal placement but empty cells remain.
    Stalemate,
}

/// Score summary. `score` is black's disks minus white's disks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameResult {
    pub score: i32,
    pub is_game_over: bool,
    pub termination: Option<Termination>,
    pub black_count: u8,
    pub white_count: u8,
    pub winner: Option<Player>,
}

pub(crate) fn in_bounds(row: i32, col: i32) -> bool {
    (0..BOARD_SIZE as i32).contains(&row) && (0..BOARD_SIZE as i32).contains(&col)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_outside_board_is_invalid_coordinate() {
        for (row, col) in [(-1, 0), (0, -1), (8, 0), (0, 8), (-1, 8), (i32::MAX, 3)] {
            let err = Action::new(row, col).position().unwrap_err();
            assert_eq!(err, Error::InvalidCoordinate { row, col });
        }
    }

    #[test]
    fn action_inside_board_maps_to_position() {
        let pos = Action::new(2, 3).position().expect("in range");

        assert_eq!((pos.row(), pos.col()), (2, 3));
        assert_eq!(pos.index(), 19);
        assert_eq!(Action::from(pos), Action::new(2, 3));
    }

    #[test]
    fn step_stops_at_every_edge() {
        let corner = Position::new(0, 0).unwrap();
        assert_eq!(corner.step(Direction::UP), None);
        assert_eq!(corner.step(Direction::LEFT), None);
        assert_eq!(corner.step(Direction::UP_RIGHT), None);
        assert_eq!(corner.step(Direction::DOWN_RIGHT), Position::new(1, 1));

        let far = Position::new(7, 7).unwrap();
        assert_eq!(far.step(Direction::DOWN), None);
        assert_eq!(far.step(Direction::RIGHT), None);
        assert_eq!(far.step(Direction::UP_LEFT), Position::new(6, 6));
    }

    #[test]
    fn end_of_row_does_not_wrap_into_next_row() {
        let end_of_row = Position::new(2, 7).unwrap();

        assert_eq!(end_of_row.step(Direction::RIGHT), None);
        assert_eq!(end_of_row.step(Direction::DOWN_RIGHT), None);
    }

    #[test]
    fn direction_ordinals_follow_all() {
        for (i, direction) in Direction::ALL.into_iter().enumerate() {
            assert_eq!(direction.ordinal() as usize, i);
        }
    }

    #[test]
    fn direction_set_tracks_membership() {
        let set: DirectionSet = [Direction::DOWN, Direction::UP_LEFT].into_iter().collect();

        assert_eq!(set.len(), 2);
        assert!(set.contains(Direction::DOWN));
        assert!(!set.contains(Direction::UP));
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![Direction::UP_LEFT, Direction::DOWN]
        );
        assert!(DirectionSet::new().is_empty());
    }

    #[test]
    fn player_index_round_trips_and_rejects_unknown() {
        for player in Player::ALL {
            assert_eq!(Player::from_index(player.index() as u8), Ok(player));
            assert_eq!(player.opponent().opponent(), player);
        }
        assert_eq!(Player::from_index(2), Err(Error::InvalidPlayer(2)));
    }

    #[test]
    fn cell_codes_match_wire_encoding() {
        assert_eq!(CellState::from_code(0), Some(CellState::Empty));
        assert_eq!(CellState::from_code(1), Some(CellState::Owned(Player::Black)));
        assert_eq!(CellState::from_code(2), Some(CellState::Owned(Player::White)));
        assert_eq!(CellState::from_code(3), None);
        assert_eq!(CellState::Owned(Player::White).code(), 2);
    }
}
