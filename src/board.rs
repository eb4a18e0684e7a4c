use itertools::{iproduct, Itertools};
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::error::{EngineError, EngineResult};
use crate::movelist::MoveList;
use crate::types::{Move, Piece, PieceKind, Position, Side, Status, Step, BOARD_SIZE};

/// Piece slots indexed `[x][y]`
pub type Grid = [[Option<Piece>; BOARD_SIZE as usize]; BOARD_SIZE as usize];

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Every square, row by row from White's back rank
pub fn squares() -> impl Iterator<Item = Position> {
    iproduct!(0..BOARD_SIZE, 0..BOARD_SIZE).map(|(y, x)| Position::new(x, y))
}

/// The board: sole owner of the pieces and of the move history.
///
/// After the initial setup the board must only be changed through
/// [`Board::make_move`] and [`Board::undo`]. The history together with the
/// starting grid is enough to rebuild the board, which is what
/// [`Board::copy`] does.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    grid: Grid,
    // grid as it was before the first move
    setup: Grid,
    history: Vec<Move>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// The standard starting position
    pub fn new() -> Board {
        let mut grid: Grid = [[None; 8]; 8];
        for (x, kind) in BACK_RANK.iter().enumerate() {
            grid[x][0] = Some(Piece::new(*kind, Side::White));
            grid[x][1] = Some(Piece::new(PieceKind::Pawn, Side::White));
            grid[x][6] = Some(Piece::new(PieceKind::Pawn, Side::Black));
            grid[x][7] = Some(Piece::new(*kind, Side::Black));
        }
        Board {
            grid,
            setup: grid,
            history: Vec::new(),
        }
    }

    /// A board with no pieces, for building custom positions with [`Board::put`]
    pub fn empty() -> Board {
        Board {
            grid: [[None; 8]; 8],
            setup: [[None; 8]; 8],
            history: Vec::new(),
        }
    }

    /// Put a piece on the board during setup.
    ///
    /// Fails once a move was played, since the history could no longer
    /// reproduce the board.
    pub fn put(&mut self, pos: Position, piece: Piece) -> EngineResult<()> {
        if !self.history.is_empty() {
            return Err(EngineError::SetupAfterMoves {
                plies: self.history.len(),
            });
        }
        if !pos.in_range() {
            return Err(EngineError::OutOfRange(pos));
        }
        self.grid[pos.x as usize][pos.y as usize] = Some(piece);
        self.setup = self.grid;
        Ok(())
    }

    pub fn in_range(&self, pos: Position) -> bool {
        pos.in_range()
    }

    /// Piece on `pos`; `None` for empty or off-board squares
    pub fn piece_at(&self, pos: Position) -> Option<&Piece> {
        if !pos.in_range() {
            return None;
        }
        self.grid[pos.x as usize][pos.y as usize].as_ref()
    }

    /// No piece on `pos`
    pub fn is_empty(&self, pos: Position) -> bool {
        self.piece_at(pos).is_none()
    }

    /// No piece of `side` on `pos`
    pub fn is_empty_for(&self, pos: Position, side: Side) -> bool {
        self.piece_at(pos).map_or(true, |p| p.side != side)
    }

    /// On the board and empty
    pub fn is_free(&self, pos: Position) -> bool {
        pos.in_range() && self.is_empty(pos)
    }

    /// On the board and not held by `side`
    pub fn is_free_for(&self, pos: Position, side: Side) -> bool {
        pos.in_range() && self.is_empty_for(pos, side)
    }

    /// All pieces of `side` with their squares
    pub fn pieces(&self, side: Side) -> impl Iterator<Item = (Position, Piece)> + '_ {
        squares().filter_map(move |pos| {
            self.piece_at(pos)
                .filter(|p| p.side == side)
                .map(|p| (pos, *p))
        })
    }

    fn find(&self, side: Side, kind: PieceKind) -> Option<Position> {
        self.pieces(side)
            .find(|(_, p)| p.kind == kind)
            .map(|(pos, _)| pos)
    }

    pub fn find_king(&self, side: Side) -> Option<Position> {
        self.find(side, PieceKind::King)
    }

    pub fn find_queen(&self, side: Side) -> Option<Position> {
        self.find(side, PieceKind::Queen)
    }

    /// The most recent move
    pub fn last(&self) -> Option<&Move> {
        self.history.last()
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Number of moves played on this board
    pub fn plies(&self) -> usize {
        self.history.len()
    }

    /// Play `mv`, running its steps in order and recording what each one
    /// displaced so it can be undone.
    ///
    /// The chain runs on a scratch grid first, so a move with a step off the
    /// board or a relocation from an empty square is rejected as a whole and
    /// the board is left untouched.
    pub fn make_move(&mut self, mut mv: Move) -> EngineResult<()> {
        let mut grid = self.grid;
        for step in mv.steps_mut() {
            exec_step(&mut grid, step)?;
        }
        self.grid = grid;
        trace!(mv = %mv, ply = self.history.len() + 1, "make move");
        self.history.push(mv);
        Ok(())
    }

    /// Take back the most recent move, its steps reversed tail first.
    pub fn undo(&mut self) -> Option<Move> {
        let mv = self.history.pop()?;
        let mut grid = self.grid;
        for step in mv.steps().iter().rev() {
            if let Err(err) = undo_step(&mut grid, step) {
                // only reachable with a history that was deserialized
                warn!(mv = %mv, %err, "cannot undo move");
                self.history.push(mv);
                return None;
            }
        }
        self.grid = grid;
        trace!(mv = %mv, ply = self.history.len(), "undo move");
        Some(mv)
    }

    /// Independent board rebuilt from the starting grid by replaying the
    /// whole history.
    pub fn copy(&self) -> Board {
        let mut fresh = Board {
            grid: self.setup,
            setup: self.setup,
            history: Vec::with_capacity(self.history.len()),
        };
        for mv in &self.history {
            if let Err(err) = fresh.make_move(mv.planned()) {
                warn!(mv = %mv, %err, "history does not replay, copy stops here");
                break;
            }
        }
        fresh
    }

    /// Does any piece of `attacker` reach `target` with a pseudo-legal move
    pub fn attacks(&self, attacker: Side, target: Position) -> bool {
        self.pieces(attacker)
            .any(|(at, p)| p.pseudo_moves(self, at).contains_dest(target))
    }

    /// Is the king of `side` attacked. A side without a king is never in check.
    pub fn check(&self, side: Side) -> bool {
        match self.find_king(side) {
            Some(king) => self.attacks(side.other(), king),
            None => false,
        }
    }

    /// Play `mv`, see whether the king of `side` is attacked, and undo.
    pub fn is_safe_after(&mut self, mv: &Move, side: Side) -> bool {
        if self.make_move(mv.planned()).is_err() {
            return false;
        }
        let safe = !self.check(side);
        self.undo();
        safe
    }

    pub fn checkmate(&mut self, side: Side) -> bool {
        self.check(side) && self.move_count(side) == 0
    }

    pub fn stalemate(&mut self, side: Side) -> bool {
        !self.check(side) && self.move_count(side) == 0
    }

    /// How the game stands for `side`, which is about to move
    pub fn status(&mut self, side: Side) -> Option<Status> {
        if self.move_count(side) > 0 {
            None
        } else if self.check(side) {
            Some(Status::Checkmate(side.other()))
        } else {
            Some(Status::Stalemate)
        }
    }

    /// Number of legal moves available to `side`
    pub fn move_count(&mut self, side: Side) -> usize {
        let pieces: Vec<(Position, Piece)> = self.pieces(side).collect();
        pieces
            .into_iter()
            .map(|(at, p)| p.generate_moves(self, at, true).len())
            .sum()
    }

    /// Moves of every piece of `side`; with `legal` set, only those that do
    /// not leave the own king attacked.
    pub fn all_moves(&mut self, side: Side, legal: bool) -> MoveList {
        let pieces: Vec<(Position, Piece)> = self.pieces(side).collect();
        let mut list = MoveList::new(side, legal);
        for (at, p) in pieces {
            list.append(p.generate_moves(self, at, legal));
        }
        list
    }

    /// Pseudo-legal moves of every piece of `side`, without touching the board
    pub fn pseudo_moves(&self, side: Side) -> MoveList {
        let mut list = MoveList::new(side, false);
        for (at, p) in self.pieces(side) {
            list.append(p.pseudo_moves(self, at));
        }
        list
    }

    /// Moves of the piece on `pos`, or `None` if the square is empty
    pub fn moves_from(&mut self, pos: Position, legal: bool) -> Option<MoveList> {
        let piece = *self.piece_at(pos)?;
        Some(piece.generate_moves(self, pos, legal))
    }

    /// Human readable description of `mv`, to be called before it is played
    pub fn describe(&self, mv: &Move) -> String {
        let Some(piece) = mv.origin().and_then(|o| self.piece_at(o)) else {
            return format!("{mv}");
        };
        let taken = mv.steps().iter().find_map(|s| match s {
            Step::Relocate { to, .. } => self.piece_at(*to).map(|p| (*to, *p)),
            Step::Remove { at, .. } if Some(*at) != mv.dest() => {
                self.piece_at(*at).map(|p| (*at, *p))
            }
            _ => None,
        });
        let maybe_capture_str = match taken {
            Some((at, p)) => format!(
                " capturing {} {} at {}",
                p.side.to_human(),
                p.kind.to_human(),
                at
            ),
            None => "".to_string(),
        };
        let maybe_promotion_str = mv
            .steps()
            .iter()
            .find_map(|s| match s {
                Step::Place { kind, .. } => Some(format!(" promoting to {}", kind.to_human())),
                _ => None,
            })
            .unwrap_or_default();
        format!(
            "{} moves {} from {} to {}{}{}",
            piece.side.to_human(),
            piece.kind.to_human(),
            mv.origin().map(|p| p.to_string()).unwrap_or_default(),
            mv.dest().map(|p| p.to_string()).unwrap_or_default(),
            maybe_capture_str,
            maybe_promotion_str,
        )
    }

    pub fn draw_board(&self) -> String {
        (0..BOARD_SIZE)
            .rev()
            .map(|y| {
                (0..BOARD_SIZE)
                    .map(|x| match self.piece_at(Position::new(x, y)) {
                        Some(p) => p.to_symbol(),
                        None => ".",
                    })
                    .join(" ")
            })
            .join("\n")
    }

    pub fn draw_to_terminal(&self) {
        println!("{}", self.draw_board());
    }
}

fn slot(grid: &mut Grid, pos: Position) -> EngineResult<&mut Option<Piece>> {
    if !pos.in_range() {
        return Err(EngineError::OutOfRange(pos));
    }
    Ok(&mut grid[pos.x as usize][pos.y as usize])
}

fn exec_step(grid: &mut Grid, step: &mut Step) -> EngineResult<()> {
    match step {
        Step::Relocate { from, to, captured } => {
            slot(grid, *to)?;
            let mut piece = slot(grid, *from)?
                .take()
                .ok_or(EngineError::EmptySquare(*from))?;
            piece.moved += 1;
            *captured = slot(grid, *to)?.replace(piece);
        }
        Step::Remove { at, captured } => {
            *captured = slot(grid, *at)?.take();
        }
        Step::Place {
            at,
            kind,
            side,
            replaced,
        } => {
            *replaced = slot(grid, *at)?.replace(Piece::new(*kind, *side));
        }
    }
    Ok(())
}

fn undo_step(grid: &mut Grid, step: &Step) -> EngineResult<()> {
    match step {
        Step::Relocate { from, to, captured } => {
            let mut piece = std::mem::replace(slot(grid, *to)?, *captured);
            if let Some(p) = piece.as_mut() {
                p.moved = p.moved.saturating_sub(1);
            }
            *slot(grid, *from)? = piece;
        }
        Step::Remove { at, captured } => {
            *slot(grid, *at)? = *captured;
        }
        Step::Place { at, replaced, .. } => {
            *slot(grid, *at)? = *replaced;
        }
    }
    Ok(())
}
