use crate::board::Board;
use crate::types::{CellState, DirectionSet, Player, Position};
use crate::validator::scan;

/// Places `player`'s disk at `action` and flips the opposing disks bracketed
/// along each of `directions`. Returns the flipped squares as a bit mask
/// (bit `row * 8 + col`).
///
/// Caller contract: `directions` is the result of
/// [`crate::validator::find_capturing_directions`] for the same board,
/// player and action. Each run is re-measured with [`scan`] before
/// flipping, so a direction that does not capture flips nothing.
pub fn apply(board: &mut Board, player: Player, action: Position, directions: DirectionSet) -> u64 {
    debug_assert_eq!(board.get(action), CellState::Empty);

    let mut flips = 0u64;
    for direction in directions.iter() {
        let Some(run) = scan(board, player, action, direction) else {
            debug_assert!(false, "{direction:?} from {action} does not capture");
            continue;
        };

        let mut cursor = action;
        for _ in 0..run {
            let Some(next) = cursor.step(direction) else {
                break;
            };
            flips |= 1u64 << next.index();
            cursor = next;
        }
    }

    board.set(action, CellState::Owned(player));
    for pos in Position::all().filter(|pos| flips & (1u64 << pos.index()) != 0) {
        board.set(pos, CellState::Owned(player));
    }

    flips
}

/// Positions of the set bits of `mask`, in row-major order.
pub fn mask_to_positions(mask: u64) -> Vec<Position> {
    let mut bits = mask;
    let mut out = Vec::new();

    while bits != 0 {
        let idx = bits.trailing_zeros() as usize;
        out.push(Position::from_index(idx));
        bits &= bits - 1;
    }

    out
}
