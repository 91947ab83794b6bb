//! Move legality.
//!
//! A placement is legal when at least one of the 8 lines leaving the target
//! cell runs through one or more opposing disks and ends on one of the
//! mover's own disks. [`scan`] walks a single line and is shared by the
//! legality check here and by the flipping in [`crate::capture`].

use crate::board::Board;
use crate::types::{CellState, Direction, DirectionSet, Player, Position};

/// Walks from `origin` along `direction` and returns how many opposing
/// disks are bracketed by one of `player`'s disks.
///
/// Returns `None` when the line is not a capture: it leaves the board or
/// reaches an empty cell before an own disk, or the adjacent disk is already
/// the player's own.
pub fn scan(board: &Board, player: Player, origin: Position, direction: Direction) -> Option<u8> {
    let opponent = player.opponent();
    let mut bracketed = 0u8;
    let mut cursor = origin.step(direction);

    while let Some(pos) = cursor {
        match board.get(pos) {
            CellState::Owned(owner) if owner == opponent => bracketed += 1,
            CellState::Owned(_) => return (bracketed > 0).then_some(bracketed),
            CellState::Empty => return None,
        }
        cursor = pos.step(direction);
    }

    None
}

/// Returns every direction in which placing at `action` captures.
/// An empty set means the placement is illegal.
pub fn find_capturing_directions(board: &Board, player: Player, action: Position) -> DirectionSet {
    if board.get(action) != CellState::Empty {
        return DirectionSet::new();
    }

    Direction::ALL
        .into_iter()
        .filter(|&direction| scan(board, player, action, direction).is_some())
        .collect()
}

pub fn is_legal(board: &Board, player: Player, action: Position) -> bool {
    !find_capturing_directions(board, player, action).is_empty()
}

/// Legal placements for `player` in row-major order.
pub fn legal_moves(board: &Board, player: Player) -> Vec<Position> {
    Position::all()
        .filter(|&pos| is_legal(board, player, pos))
        .collect()
}

pub fn has_legal_move(board: &Board, player: Player) -> bool {
    Position::all().any(|pos| is_legal(board, player, pos))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: usize, col: usize) -> Position {
        Position::new(row, col).unwrap()
    }

    fn board_from(rows: [&str; 8]) -> Board {
        let mut board = Board::empty();
        for (r, line) in rows.iter().enumerate() {
            for (c, ch) in line.chars().enumerate() {
                let state = match ch {
                    'X' => CellState::Owned(Player::Black),
                    'O' => CellState::Owned(Player::White),
                    _ => CellState::Empty,
                };
                board.set(pos(r, c), state);
            }
        }
        board
    }

    #[test]
    fn t01_opening_move_above_centre_captures_downward() {
        let board = Board::new();

        let dirs = find_capturing_directions(&board, Player::Black, pos(2, 3));

        assert_eq!(dirs.iter().collect::<Vec<_>>(), vec![Direction::DOWN]);
        assert!(is_legal(&board, Player::Black, pos(2, 3)));
    }

    #[test]
    fn mirrored_opening_move_is_legal_for_white() {
        let board = Board::new();

        let dirs = find_capturing_directions(&board, Player::White, pos(2, 4));

        assert_eq!(dirs.iter().collect::<Vec<_>>(), vec![Direction::DOWN]);
        assert!(!is_legal(&board, Player::White, pos(2, 3)));
    }

    #[test]
    fn initial_legal_moves_are_four_expected_squares() {
        let board = Board::new();

        assert_eq!(
            legal_moves(&board, Player::Black),
            vec![pos(2, 3), pos(3, 2), pos(4, 5), pos(5, 4)]
        );
        assert_eq!(
            legal_moves(&board, Player::White),
            vec![pos(2, 4), pos(3, 5), pos(4, 2), pos(5, 3)]
        );
    }

    #[test]
    fn occupied_target_is_never_legal() {
        let board = board_from([
            "........", "........", "...XO...", "...OX...", "...XO...", "........", "........",
            "........",
        ]);

        for target in Position::all().filter(|&p| board.get(p) != CellState::Empty) {
            for player in Player::ALL {
                assert!(find_capturing_directions(&board, player, target).is_empty());
            }
        }
    }

    #[test]
    fn run_reaching_edge_without_bracket_does_not_capture() {
        let board = board_from([
            "X.OOOOOO", "........", "........", "........", "........", "........", "........",
            "........",
        ]);

        assert_eq!(scan(&board, Player::Black, pos(0, 1), Direction::RIGHT), None);
        assert!(!is_legal(&board, Player::Black, pos(0, 1)));
    }

    #[test]
    fn run_ending_on_empty_does_not_capture() {
        let board = board_from([
            "........", "........", "..OO.X..", "........", "........", "........", "........",
            "........",
        ]);

        assert_eq!(scan(&board, Player::Black, pos(2, 1), Direction::RIGHT), None);
    }

    #[test]
    fn adjacent_own_disk_does_not_capture() {
        let board = board_from([
            "........", "........", "..XO X..", "........", "........", "........", "........",
            "........",
        ]);

        assert_eq!(scan(&board, Player::Black, pos(2, 1), Direction::RIGHT), None);
    }

    #[test]
    fn long_bracketed_run_counts_every_disk() {
        let board = board_from([
            ".OOOOOOX", "........", "........", "........", "........", "........", "........",
            "........",
        ]);

        assert_eq!(scan(&board, Player::Black, pos(0, 0), Direction::RIGHT), Some(6));
        assert_eq!(scan(&board, Player::White, pos(0, 0), Direction::RIGHT), None);
    }

    #[test]
    fn run_along_row_end_does_not_wrap_into_next_row() {
        // Flat indexing would continue from (1, 7) into (2, 0).
        let board = board_from([
            "........", "......OO", "X.......", "........", "........", "........", "........",
            "........",
        ]);

        assert_eq!(scan(&board, Player::Black, pos(1, 5), Direction::RIGHT), None);
        assert!(find_capturing_directions(&board, Player::Black, pos(1, 5)).is_empty());
    }

    #[test]
    fn multiple_directions_are_all_collected() {
        let board = board_from([
            "X.X.X...", ".OOO....", "XO.OX...", ".OOO....", "X.X.X...", "........", "........",
            "........",
        ]);

        let dirs = find_capturing_directions(&board, Player::Black, pos(2, 2));

        assert_eq!(dirs.len(), 8);
        assert!(has_legal_move(&board, Player::Black));
    }

    #[test]
    fn corner_and_edge_targets_never_scan_off_board() {
        let board = board_from([
            ".O.....O", "OO.....O", "........", "........", "........", "........", "O......O",
            ".O....O.",
        ]);

        for target in [pos(0, 0), pos(7, 0), pos(7, 7), pos(0, 6), pos(6, 1)] {
            assert!(find_capturing_directions(&board, Player::Black, target).is_empty());
        }
    }
}
