use rayon::prelude::*;
use tracing::debug;

use crate::board::Board;
use crate::types::Side;

/// Count the leaf positions `depth` plies below the current one, `side` to
/// move. The board is walked with make/undo and left as it was found.
pub fn run_perft_test(board: &mut Board, side: Side, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = board.all_moves(side, true);
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0;
    for m in moves {
        if board.make_move(m).is_ok() {
            nodes += run_perft_test(board, side.other(), depth - 1);
            board.undo();
        }
    }
    nodes
}

/// Same count as [`run_perft_test`], with the root moves split across the
/// rayon thread pool. Each task works on its own copy of the board.
pub fn run_perft_parallel(board: &Board, side: Side, depth: u8) -> u64 {
    if depth <= 1 {
        return run_perft_test(&mut board.copy(), side, depth);
    }

    let moves: Vec<_> = board.copy().all_moves(side, true).into_iter().collect();
    moves
        .into_par_iter()
        .map(|m| {
            let mut b = board.copy();
            let label = m.to_string();
            if b.make_move(m).is_err() {
                return 0;
            }
            let nodes = run_perft_test(&mut b, side.other(), depth - 1);
            debug!(mv = %label, nodes, "perft divide");
            nodes
        })
        .sum()
}

/// Perft from starting position
///
/// https://www.chessprogramming.org/Perft_Results
///
/// Castling first shows up at depth 7 and promotions at depth 9, neither of
/// which is modelled here, so only the counts up to depth 6 are listed.
///
/// | Depth | Nodes       | Captures  | E.p. | Checks  | Checkmates |
/// | ----- | ----------- | --------- | ---- | ------- | ---------- |
/// | 0     | 1           | 0         | 0    | 0       | 0          |
/// | 1     | 20          | 0         | 0    | 0       | 0          |
/// | 2     | 400         | 0         | 0    | 0       | 0          |
/// | 3     | 8,902       | 34        | 0    | 12      | 0          |
/// | 4     | 197,281     | 1576      | 0    | 469     | 8          |
/// | 5     | 4,865,609   | 82,719    | 258  | 27,351  | 347        |
/// | 6     | 119,060,324 | 2,812,008 | 5248 | 809,099 | 10,828     |
pub fn expected_node_count(depth: u8) -> Option<u64> {
    match depth {
        0 => Some(1),
        1 => Some(20),
        2 => Some(400),
        3 => Some(8902),
        4 => Some(197_281),
        5 => Some(4_865_609),
        6 => Some(119_060_324),
        _ => None,
    }
}
