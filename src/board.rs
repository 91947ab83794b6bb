use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::{Error, Result};
use crate::types::{CellState, Player, Position};

pub const BOARD_SIZE: usize = 8;
pub const NUM_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;

/// Starting disks: black on (3,4) and (4,3), white on (3,3) and (4,4).
const INITIAL_BLACK: u64 = bit(3 * BOARD_SIZE + 4) | bit(4 * BOARD_SIZE + 3);
const INITIAL_WHITE: u64 = bit(3 * BOARD_SIZE + 3) | bit(4 * BOARD_SIZE + 4);

/// Othello board represented by two row-major bitboards.
///
/// The board is `Copy`, so any copy is a full snapshot that later moves
/// cannot alter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    black: u64,
    white: u64,
}

impl Board {
    /// Creates the starting position.
    pub fn new() -> Self {
        Self {
            black: INITIAL_BLACK,
            white: INITIAL_WHITE,
        }
    }

    pub fn empty() -> Self {
        Self { black: 0, white: 0 }
    }

    /// Caller contract: the two masks must not overlap.
    pub fn from_bitboards(black: u64, white: u64) -> Self {
        debug_assert_eq!(black & white, 0, "a cell cannot have two owners");
        Self { black, white }
    }

    /// Inverse of [`Board::to_array`]: 64 cells in row-major order,
    /// 0=empty, 1=black, 2=white.
    pub fn from_cells(cells: &[u8]) -> Result<Self> {
        if cells.len() != NUM_SQUARES {
            return Err(Error::InvalidBoard(format!(
                "expected {NUM_SQUARES} cells, got {}",
                cells.len()
            )));
        }

        let mut board = Self::empty();
        for (pos, &code) in cells.iter().enumerate() {
            let state = CellState::from_code(code).ok_or_else(|| {
                Error::InvalidBoard(format!("cell {pos} has unknown value {code}"))
            })?;
            board.set(Position::from_index(pos), state);
        }
        Ok(board)
    }

    /// Returns the state of `(row, col)`.
    pub fn cell_at(&self, row: usize, col: usize) -> Result<CellState> {
        let pos = Position::new(row, col).ok_or(Error::OutOfBounds { row, col })?;
        Ok(self.get(pos))
    }

    /// Overwrites the state of `(row, col)`.
    pub fn set_cell(&mut self, row: usize, col: usize, state: CellState) -> Result<()> {
        let pos = Position::new(row, col).ok_or(Error::OutOfBounds { row, col })?;
        self.set(pos, state);
        Ok(())
    }

    pub fn get(&self, pos: Position) -> CellState {
        let square = bit(pos.index());
        if self.black & square != 0 {
            CellState::Owned(Player::Black)
        } else if self.white & square != 0 {
            CellState::Owned(Player::White)
        } else {
            CellState::Empty
        }
    }

    pub fn set(&mut self, pos: Position, state: CellState) {
        let square = bit(pos.index());
        self.black &= !square;
        self.white &= !square;
        match state {
            CellState::Empty => {}
            CellState::Owned(Player::Black) => self.black |= square,
            CellState::Owned(Player::White) => self.white |= square,
        }
    }

    pub fn is_full(&self) -> bool {
        self.black | self.white == u64::MAX
    }

    pub fn count_owner(&self, owner: Player) -> u8 {
        match owner {
            Player::Black => self.black.count_ones() as u8,
            Player::White => self.white.count_ones() as u8,
        }
    }

    /// Returns `(black_count, white_count)`.
    pub fn count(&self) -> (u8, u8) {
        (
            self.count_owner(Player::Black),
            self.count_owner(Player::White),
        )
    }

    /// Returns the number of empty squares.
    pub fn empty_count(&self) -> u8 {
        let (black_count, white_count) = self.count();
        NUM_SQUARES as u8 - black_count - white_count
    }

    /// Converts board to `[u8; 64]` where 0=empty, 1=black, 2=white.
    pub fn to_array(&self) -> [u8; NUM_SQUARES] {
        let mut board = [0u8; NUM_SQUARES];
        for (pos, cell) in board.iter_mut().enumerate() {
            *cell = self.get(Position::from_index(pos)).code();
        }
        board
    }

    /// The grid as rows of cell states.
    pub fn rows(&self) -> [[CellState; BOARD_SIZE]; BOARD_SIZE] {
        let mut rows = [[CellState::Empty; BOARD_SIZE]; BOARD_SIZE];
        for pos in Position::all() {
            rows[pos.row()][pos.col()] = self.get(pos);
        }
        rows
    }

    /// CRC-32 of [`Board::to_array`]; a compact identity for logs and
    /// regression checks.
    pub fn fingerprint(&self) -> u32 {
        crc32fast::hash(&self.to_array())
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for cell in row {
                let c = match cell {
                    CellState::Empty => '.',
                    CellState::Owned(Player::Black) => 'X',
                    CellState::Owned(Player::White) => 'O',
                };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.to_array())
    }
}

const fn bit(pos: usize) -> u64 {
    if pos < NUM_SQUARES { 1u64 << pos } else { 0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idx(row: usize, col: usize) -> usize {
        row * BOARD_SIZE + col
    }

    #[test]
    fn t01_initial_board_has_two_diagonal_disks_per_player() {
        let board = Board::new();

        assert_eq!(board.cell_at(3, 4), Ok(CellState::Owned(Player::Black)));
        assert_eq!(board.cell_at(4, 3), Ok(CellState::Owned(Player::Black)));
        assert_eq!(board.cell_at(3, 3), Ok(CellState::Owned(Player::White)));
        assert_eq!(board.cell_at(4, 4), Ok(CellState::Owned(Player::White)));
        assert_eq!(board.count(), (2, 2));
        assert_eq!(board.empty_count(), 60);
        assert!(!board.is_full());
    }

    #[test]
    fn out_of_range_access_fails_instead_of_wrapping() {
        let mut board = Board::new();

        assert_eq!(board.cell_at(8, 0), Err(Error::OutOfBounds { row: 8, col: 0 }));
        assert_eq!(board.cell_at(0, 8), Err(Error::OutOfBounds { row: 0, col: 8 }));
        assert_eq!(
            board.set_cell(3, 9, CellState::Owned(Player::Black)),
            Err(Error::OutOfBounds { row: 3, col: 9 })
        );
        // (3, 9) would alias (4, 1) in a flat array.
        assert_eq!(board.cell_at(4, 1), Ok(CellState::Empty));
        assert_eq!(board, Board::new());
    }

    #[test]
    fn set_cell_replaces_owner() {
        let mut board = Board::new();

        board
            .set_cell(3, 3, CellState::Owned(Player::Black))
            .expect("in range");

        assert_eq!(board.cell_at(3, 3), Ok(CellState::Owned(Player::Black)));
        assert_eq!(board.count(), (3, 1));
        assert_eq!(board.empty_count(), 60);
    }

    #[test]
    fn full_board_is_detected() {
        let board = Board::from_bitboards(u64::MAX ^ bit(idx(7, 7)), bit(idx(7, 7)));

        assert!(board.is_full());
        assert_eq!(board.empty_count(), 0);
        assert_eq!(board.count_owner(Player::White), 1);
    }

    #[test]
    fn cells_round_trip_through_wire_encoding() {
        let board = Board::new();
        let cells = board.to_array();

        assert_eq!(cells[idx(3, 4)], 1);
        assert_eq!(cells[idx(3, 3)], 2);
        assert_eq!(cells.iter().filter(|&&c| c == 0).count(), 60);
        assert_eq!(Board::from_cells(&cells), Ok(board));
    }

    #[test]
    fn from_cells_rejects_bad_input() {
        assert!(matches!(
            Board::from_cells(&[0; 63]),
            Err(Error::InvalidBoard(_))
        ));

        let mut cells = [0u8; NUM_SQUARES];
        cells[10] = 7;
        let err = Board::from_cells(&cells).unwrap_err();
        assert!(err.to_string().contains("cell 10"));
    }

    #[test]
    fn copies_are_independent_snapshots() {
        let mut board = Board::new();
        let snapshot = board;

        board
            .set_cell(0, 0, CellState::Owned(Player::White))
            .expect("in range");

        assert_eq!(snapshot.cell_at(0, 0), Ok(CellState::Empty));
        assert_ne!(snapshot.fingerprint(), board.fingerprint());
    }

    #[test]
    fn display_draws_grid() {
        let text = Board::new().to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 8);
        assert_eq!(lines[3], "...OX...");
        assert_eq!(lines[4], "...XO...");
    }
}
