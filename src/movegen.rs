//! Per-piece move generation.
//!
//! Every piece kind has one generation routine here. Sliding pieces (and the
//! king, which is a slider capped at one square) share [`slide`].

use crate::board::Board;
use crate::movelist::MoveList;
use crate::types::{Move, Piece, PieceKind, Position, Side, Step, BOARD_SIZE};

pub const ROOK_DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
pub const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (-1, 1), (1, -1), (-1, -1)];
pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (-2, 1),
    (-2, -1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-1, 2),
];

/// Ray length that always reaches the edge
const UNLIMITED: i8 = BOARD_SIZE;

impl Piece {
    /// Candidate moves for this piece standing on `at`.
    ///
    /// With `legal` set, moves that leave the own king attacked are removed by
    /// trial-playing them on `board`; the board is returned to its state on
    /// entry either way.
    pub fn generate_moves(&self, board: &mut Board, at: Position, legal: bool) -> MoveList {
        let mut list = MoveList::new(self.side, legal);
        self.collect_moves(board, at, &mut list);
        list.retain_legal(board);
        list
    }

    /// Moves obeying the piece's movement pattern and occupancy, ignoring
    /// king safety
    pub fn pseudo_moves(&self, board: &Board, at: Position) -> MoveList {
        let mut list = MoveList::new(self.side, false);
        self.collect_moves(board, at, &mut list);
        list
    }

    fn collect_moves(&self, board: &Board, at: Position, list: &mut MoveList) {
        match self.kind {
            PieceKind::Pawn => self.pawn_moves(board, at, list),
            PieceKind::Knight => knight_moves(board, at, list),
            PieceKind::Bishop => slide(board, at, &BISHOP_DIRECTIONS, UNLIMITED, list),
            PieceKind::Rook => slide(board, at, &ROOK_DIRECTIONS, UNLIMITED, list),
            PieceKind::Queen => {
                slide(board, at, &ROOK_DIRECTIONS, UNLIMITED, list);
                slide(board, at, &BISHOP_DIRECTIONS, UNLIMITED, list);
            }
            PieceKind::King => {
                slide(board, at, &ROOK_DIRECTIONS, 1, list);
                slide(board, at, &BISHOP_DIRECTIONS, 1, list);
            }
        }
    }

    fn pawn_moves(&self, board: &Board, at: Position, list: &mut MoveList) {
        let side = self.side;
        let dir = side.forward();

        // the double step is only tried when the single step was accepted
        let single = promoting(side, Move::new(at, at.relative(0, dir)));
        if list.add_move(board, single) && !self.has_moved() {
            let double = promoting(side, Move::new(at, at.relative(0, 2 * dir)));
            list.add_move(board, double);
        }

        for dx in [-1, 1] {
            let capture = promoting(side, Move::new(at, at.relative(dx, dir)));
            list.add_capture_only(board, capture);
        }

        if let Some(passant) = en_passant(board, at, side) {
            list.add_move(board, passant);
        }
    }
}

fn knight_moves(board: &Board, at: Position, list: &mut MoveList) {
    for (dx, dy) in KNIGHT_OFFSETS {
        list.add_capture(board, Move::new(at, at.relative(dx, dy)));
    }
}

/// Scan each direction outward from `from`, at most `limit` squares.
///
/// A ray stops at the edge or at the first occupied square, which is kept
/// only when it holds an opposing piece. The side is the list's side.
pub fn slide(
    board: &Board,
    from: Position,
    directions: &[(i8, i8)],
    limit: i8,
    list: &mut MoveList,
) {
    for &(dx, dy) in directions {
        let mut pos = from;
        for _ in 0..limit {
            pos = pos.relative(dx, dy);
            if !list.add_capture(board, Move::new(from, pos)) {
                break;
            }
            if !board.is_free(pos) {
                break;
            }
        }
    }
}

/// Turn a pawn move landing on the far rank into
/// relocate, remove the pawn, place a queen.
fn promoting(side: Side, mv: Move) -> Move {
    match mv.dest() {
        Some(dest) if dest.y == side.far_rank() => mv
            .then(Step::remove(dest))
            .then(Step::place(dest, PieceKind::Queen, side)),
        _ => mv,
    }
}

/// Diagonal capture of a pawn that just advanced two squares to stand beside
/// the pawn on `at`.
fn en_passant(board: &Board, at: Position, side: Side) -> Option<Move> {
    let last = board.last()?;
    let (origin, dest) = (last.origin()?, last.dest()?);
    let dir = side.forward();

    [-1, 1].into_iter().find_map(|dx| {
        let beside = at.relative(dx, 0);
        let passed = dest == beside
            && origin.x == dest.x
            && origin.y == dest.y + 2 * dir
            && board
                .piece_at(beside)
                .is_some_and(|p| p.kind == PieceKind::Pawn && p.side != side);
        passed.then(|| Move::new(at, at.relative(dx, dir)).then(Step::remove(beside)))
    })
}
