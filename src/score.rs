use crate::board::Board;
use crate::types::{GameResult, Player, Termination};

/// Black's disk count minus white's: positive favours black (player 0),
/// negative favours white, zero is a tie.
///
/// Counted directly from both owners, so the value is also right for a game
/// that ended in stalemate with empty cells left.
pub fn evaluate(board: &Board) -> i32 {
    board.count_owner(Player::Black) as i32 - board.count_owner(Player::White) as i32
}

/// Score from `player`'s point of view.
pub fn score_for(board: &Board, player: Player) -> i32 {
    match player {
        Player::Black => evaluate(board),
        Player::White => -evaluate(board),
    }
}

pub fn winner(board: &Board) -> Option<Player> {
    match evaluate(board) {
        s if s > 0 => Some(Player::Black),
        s if s < 0 => Some(Player::White),
        _ => None,
    }
}

pub fn result(board: &Board, termination: Option<Termination>) -> GameResult {
    let (black_count, white_count) = board.count();
    GameResult {
        score: evaluate(board),
        is_game_over: termination.is_some(),
        termination,
        black_count,
        white_count,
        winner: winner(board),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_board_score_matches_empty_count_formula() {
        let board = Board::from_bitboards(0x00FF_00FF_00FF_FFFF, !0x00FF_00FF_00FF_FFFF);
        let formula = 64
            - board.empty_count() as i32
            - 2 * board.count_owner(Player::White) as i32;

        assert_eq!(evaluate(&board), formula);
        assert_eq!(evaluate(&board), 40 - 24);
        assert_eq!(winner(&board), Some(Player::Black));
        assert_eq!(score_for(&board, Player::White), -16);
    }

    #[test]
    fn partial_board_counts_owners_only() {
        let board = Board::from_bitboards(0b1, 0b1110);

        assert_eq!(evaluate(&board), -2);
        assert_eq!(winner(&board), Some(Player::White));
    }

    #[test]
    fn initial_board_is_a_tie_in_progress() {
        let summary = result(&Board::new(), None);

        assert_eq!(summary.score, 0);
        assert_eq!(summary.winner, None);
        assert!(!summary.is_game_over);
        assert_eq!((summary.black_count, summary.white_count), (2, 2));
    }
}
