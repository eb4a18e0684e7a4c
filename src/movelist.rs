//! Ordered collection of candidate moves for one side.
//!
//! Move generation pushes candidates through the three `add_*` gates, each
//! of which checks the destination against the board before accepting.
//! A list created with `legal = true` is later passed through
//! [`MoveList::retain_legal`], which trial-runs every candidate on the board.

use crate::board::Board;
use crate::types::{Move, Position, Side, Step};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveList {
    side: Side,
    legal: bool,
    moves: Vec<Move>,
}

impl MoveList {
    pub fn new(side: Side, legal: bool) -> Self {
        Self {
            side,
            legal,
            moves: Vec::new(),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Quiet move gate: destination on the board and empty.
    pub fn add_move(&mut self, board: &Board, mv: Move) -> bool {
        match mv.dest() {
            Some(dest) if board.is_free(dest) => {
                self.push(mv);
                true
            }
            _ => false,
        }
    }

    /// Capture only gate: destination holds an opposing piece.
    pub fn add_capture_only(&mut self, board: &Board, mv: Move) -> bool {
        match mv.dest() {
            Some(dest) if board.in_range(dest) && !board.is_empty_for(dest, self.side.other()) => {
                self.push(mv);
                true
            }
            _ => false,
        }
    }

    /// Move or capture gate: destination not held by a friendly piece.
    pub fn add_capture(&mut self, board: &Board, mv: Move) -> bool {
        match mv.dest() {
            Some(dest) if board.is_free_for(dest, self.side) => {
                self.push(mv);
                true
            }
            _ => false,
        }
    }

    /// Append unless a move with the same origin and destination is present
    fn push(&mut self, mv: Move) {
        let key = (mv.origin(), mv.dest());
        if !self.moves.iter().any(|m| (m.origin(), m.dest()) == key) {
            self.moves.push(mv);
        }
    }

    /// Drop every move that leaves the mover's king attacked.
    ///
    /// Each candidate is played on `board`, the king tested with the
    /// pseudo-legal attack check, and the move undone before the next one.
    /// No-op for lists created with `legal = false`.
    pub fn retain_legal(&mut self, board: &mut Board) {
        if !self.legal {
            return;
        }
        let side = self.side;
        self.moves.retain(|mv| board.is_safe_after(mv, side));
    }

    /// Append all moves of `other` (same duplicate rule)
    pub fn append(&mut self, other: MoveList) {
        for mv in other.moves {
            self.push(mv);
        }
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.moves.iter()
    }

    pub fn get(&self, idx: usize) -> Option<&Move> {
        self.moves.get(idx)
    }

    pub fn as_slice(&self) -> &[Move] {
        &self.moves
    }

    /// Does any move land on `pos`
    pub fn contains_dest(&self, pos: Position) -> bool {
        self.moves.iter().any(|m| m.dest() == Some(pos))
    }

    /// The move going from `from` to `to`, if generated
    pub fn find(&self, from: Position, to: Position) -> Option<&Move> {
        self.moves
            .iter()
            .find(|m| m.origin() == Some(from) && m.dest() == Some(to))
    }

    /// Moves that take an opposing piece, judged against `board` before the
    /// move is played
    pub fn captures<'a>(&'a self, board: &'a Board) -> impl Iterator<Item = &'a Move> + 'a {
        let enemy = self.side.other();
        self.moves.iter().filter(move |m| takes(board, enemy, m))
    }

    /// Moves that take nothing
    pub fn quiet<'a>(&'a self, board: &'a Board) -> impl Iterator<Item = &'a Move> + 'a {
        let enemy = self.side.other();
        self.moves.iter().filter(move |m| !takes(board, enemy, m))
    }
}

fn takes(board: &Board, enemy: Side, mv: &Move) -> bool {
    mv.steps().iter().any(|s| match s {
        Step::Relocate { to, .. } => board.piece_at(*to).is_some_and(|p| p.side == enemy),
        Step::Remove { at, .. } => {
            Some(*at) != mv.dest() && board.piece_at(*at).is_some_and(|p| p.side == enemy)
        }
        Step::Place { .. } => false,
    })
}

impl IntoIterator for MoveList {
    type Item = Move;
    type IntoIter = std::vec::IntoIter<Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.into_iter()
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Piece, PieceKind};

    fn pos(s: &str) -> Position {
        Position::from_algebraic(s).unwrap()
    }

    fn board_with(pieces: &[(&str, char)]) -> Board {
        let mut b = Board::empty();
        for (sq, c) in pieces {
            b.put(pos(sq), Piece::from_char(*c).unwrap()).unwrap();
        }
        b
    }

    #[test]
    fn test_add_move_requires_empty_square() {
        let b = board_with(&[("d4", 'R'), ("d5", 'p'), ("e4", 'P')]);
        let mut list = MoveList::new(Side::White, false);
        assert!(list.add_move(&b, Move::new(pos("d4"), pos("d3"))));
        assert!(!list.add_move(&b, Move::new(pos("d4"), pos("d5"))));
        assert!(!list.add_move(&b, Move::new(pos("d4"), pos("e4"))));
        assert!(!list.add_move(&b, Move::new(pos("a1"), Position::new(-1, 0))));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_add_capture_only_requires_enemy() {
        let b = board_with(&[("d4", 'R'), ("d5", 'p'), ("e4", 'P')]);
        let mut list = MoveList::new(Side::White, false);
        assert!(list.add_capture_only(&b, Move::new(pos("d4"), pos("d5"))));
        assert!(!list.add_capture_only(&b, Move::new(pos("d4"), pos("e4"))));
        assert!(!list.add_capture_only(&b, Move::new(pos("d4"), pos("d3"))));
        assert!(!list.add_capture_only(&b, Move::new(pos("d4"), Position::new(3, 8))));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_add_capture_excludes_friends() {
        let b = board_with(&[("d4", 'R'), ("d5", 'p'), ("e4", 'P')]);
        let mut list = MoveList::new(Side::White, false);
        assert!(list.add_capture(&b, Move::new(pos("d4"), pos("d5"))));
        assert!(list.add_capture(&b, Move::new(pos("d4"), pos("d3"))));
        assert!(!list.add_capture(&b, Move::new(pos("d4"), pos("e4"))));
        assert_eq!(list.len(), 2);
        assert_eq!(list.captures(&b).count(), 1);
        assert_eq!(list.quiet(&b).count(), 1);
    }

    #[test]
    fn test_no_duplicates() {
        let b = board_with(&[("d4", 'R')]);
        let mut list = MoveList::new(Side::White, false);
        assert!(list.add_capture(&b, Move::new(pos("d4"), pos("d8"))));
        // accepted by the gate, but not stored twice
        assert!(list.add_capture(&b, Move::new(pos("d4"), pos("d8"))));
        assert_eq!(list.len(), 1);
        assert!(list.contains_dest(pos("d8")));
        assert!(list.find(pos("d4"), pos("d8")).is_some());
        assert!(list.find(pos("d4"), pos("d7")).is_none());
    }

    #[test]
    fn test_retain_legal_drops_moves_into_check() {
        // white king on e1, black rook on d8 controls the d-file
        let mut b = board_with(&[("e1", 'K'), ("d8", 'r'), ("a8", 'k')]);
        let mut list = MoveList::new(Side::White, true);
        list.add_capture(&b, Move::new(pos("e1"), pos("d1")));
        list.add_capture(&b, Move::new(pos("e1"), pos("f1")));
        list.retain_legal(&mut b);
        assert_eq!(list.len(), 1);
        assert_eq!(list.get(0).and_then(|m| m.dest()), Some(pos("f1")));
        // the board is left as found
        assert_eq!(b.plies(), 0);
        assert_eq!(b.piece_at(pos("e1")).map(|p| p.kind), Some(PieceKind::King));
    }
}
