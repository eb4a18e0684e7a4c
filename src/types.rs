use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{EngineError, EngineResult};

/// Width and height of the board
pub const BOARD_SIZE: i8 = 8;

/// Longest chain of steps a single move needs (promotion)
pub const MAX_STEPS: usize = 3;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum Side {
    White,
    Black,
}

impl Side {
    pub fn from_char(c: char) -> Option<Side> {
        match c {
            'w' => Some(Side::White),
            'b' => Some(Side::Black),
            _ => None,
        }
    }

    pub fn from_case(c: char) -> Side {
        if c.is_uppercase() {
            Side::White
        } else {
            Side::Black
        }
    }

    pub fn other(&self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// Direction pawns of this side advance along y
    pub fn forward(&self) -> i8 {
        match self {
            Side::White => 1,
            Side::Black => -1,
        }
    }

    /// Row a pawn of this side promotes on
    pub fn far_rank(&self) -> i8 {
        match self {
            Side::White => BOARD_SIZE - 1,
            Side::Black => 0,
        }
    }

    pub fn to_human(&self) -> &str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_human())
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub fn from_char(c: char) -> Option<PieceKind> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }

    /// Look a kind up by its English name, case insensitive.
    ///
    /// This is the factory used when a piece has to be built from text; an
    /// unknown name is an error rather than a silently missing piece.
    pub fn from_name(name: &str) -> EngineResult<PieceKind> {
        match name.trim().to_ascii_lowercase().as_str() {
            "pawn" => Ok(PieceKind::Pawn),
            "knight" => Ok(PieceKind::Knight),
            "bishop" => Ok(PieceKind::Bishop),
            "rook" => Ok(PieceKind::Rook),
            "queen" => Ok(PieceKind::Queen),
            "king" => Ok(PieceKind::King),
            _ => Err(EngineError::UnknownPiece(name.to_string())),
        }
    }

    pub fn to_human(&self) -> &str {
        match self {
            Self::Pawn => "pawn",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Rook => "rook",
            Self::Queen => "queen",
            Self::King => "king",
        }
    }

    pub fn to_char(&self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Knight => 'N',
            Self::Bishop => 'B',
            Self::Rook => 'R',
            Self::Queen => 'Q',
            Self::King => 'K',
        }
    }
}

impl FromStr for PieceKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PieceKind::from_name(s)
    }
}

/// A board coordinate. `x` is the file (0 is the a-file), `y` the row (0 is
/// White's back rank).
///
/// Nothing stops a position from lying off the board: offsets are computed
/// freely and the board range-checks before use.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i8,
    pub y: i8,
}

impl Position {
    pub const fn new(x: i8, y: i8) -> Position {
        Position { x, y }
    }

    /// Position offset from this one by `(dx, dy)`, without wraparound
    pub const fn relative(self, dx: i8, dy: i8) -> Position {
        Position {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn in_range(&self) -> bool {
        (0..BOARD_SIZE).contains(&self.x) && (0..BOARD_SIZE).contains(&self.y)
    }

    pub fn from_algebraic(s: &str) -> EngineResult<Position> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(EngineError::BadSquare(s.to_string()));
        }
        let pos = Position::new(
            bytes[0].wrapping_sub(b'a') as i8,
            bytes[1].wrapping_sub(b'1') as i8,
        );
        if pos.in_range() {
            Ok(pos)
        } else {
            Err(EngineError::BadSquare(s.to_string()))
        }
    }

    /// Square name such as `e4`; off-board positions print as coordinates
    pub fn to_algebraic(&self) -> String {
        if self.in_range() {
            format!("{}{}", (b'a' + self.x as u8) as char, self.y + 1)
        } else {
            format!("({},{})", self.x, self.y)
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_algebraic())
    }
}

impl FromStr for Position {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_algebraic(s)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub side: Side,
    pub kind: PieceKind,
    /// How many times this piece has moved
    pub moved: u32,
}

impl Piece {
    pub fn new(kind: PieceKind, side: Side) -> Piece {
        Piece {
            side,
            kind,
            moved: 0,
        }
    }

    /// Build a fresh piece from its name, e.g. `"queen"`
    pub fn create(name: &str, side: Side) -> EngineResult<Piece> {
        Ok(Piece::new(PieceKind::from_name(name)?, side))
    }

    /// Piece from its letter, upper case for White
    pub fn from_char(c: char) -> Option<Piece> {
        PieceKind::from_char(c).map(|kind| Piece::new(kind, Side::from_case(c)))
    }

    pub fn has_moved(&self) -> bool {
        self.moved > 0
    }

    pub fn to_symbol(&self) -> &str {
        let is_white = self.side == Side::White;
        match self.kind {
            PieceKind::Pawn => {
                if is_white {
                    "♙"
                } else {
                    "♟︎"
                }
            }
            PieceKind::Knight => {
                if is_white {
                    "♘"
                } else {
                    "♞"
                }
            }
            PieceKind::Bishop => {
                if is_white {
                    "♗"
                } else {
                    "♝"
                }
            }
            PieceKind::Rook => {
                if is_white {
                    "♖"
                } else {
                    "♜"
                }
            }
            PieceKind::Queen => {
                if is_white {
                    "♕"
                } else {
                    "♛"
                }
            }
            PieceKind::King => {
                if is_white {
                    "♔"
                } else {
                    "♚"
                }
            }
        }
    }

    pub fn to_char(&self) -> char {
        match self.side {
            Side::White => self.kind.to_char(),
            Side::Black => self.kind.to_char().to_ascii_lowercase(),
        }
    }
}

/// One atomic edit of the grid. A move is a short chain of these.
///
/// The `captured` / `replaced` records are filled in by the board when the
/// step runs, so undo can put back whatever was there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    /// Move the piece on `from` to `to`, taking whatever stood on `to`
    Relocate {
        from: Position,
        to: Position,
        captured: Option<Piece>,
    },
    /// Take the piece on `at` off the board
    Remove {
        at: Position,
        captured: Option<Piece>,
    },
    /// Put a brand new piece on `at`
    Place {
        at: Position,
        kind: PieceKind,
        side: Side,
        replaced: Option<Piece>,
    },
}

impl Step {
    pub fn relocate(from: Position, to: Position) -> Step {
        Step::Relocate {
            from,
            to,
            captured: None,
        }
    }

    pub fn remove(at: Position) -> Step {
        Step::Remove { at, captured: None }
    }

    pub fn place(at: Position, kind: PieceKind, side: Side) -> Step {
        Step::Place {
            at,
            kind,
            side,
            replaced: None,
        }
    }

    pub fn origin(&self) -> Option<Position> {
        match self {
            Step::Relocate { from, .. } => Some(*from),
            Step::Remove { at, .. } => Some(*at),
            Step::Place { .. } => None,
        }
    }

    pub fn dest(&self) -> Option<Position> {
        match self {
            Step::Relocate { to, .. } => Some(*to),
            Step::Remove { .. } => None,
            Step::Place { at, .. } => Some(*at),
        }
    }

    /// Same edit, ignoring what the board recorded when it ran
    pub fn same_edit(&self, other: &Step) -> bool {
        match (self, other) {
            (Step::Relocate { from: a, to: b, .. }, Step::Relocate { from: c, to: d, .. }) => {
                a == c && b == d
            }
            (Step::Remove { at: a, .. }, Step::Remove { at: b, .. }) => a == b,
            (
                Step::Place {
                    at: a,
                    kind: k1,
                    side: s1,
                    ..
                },
                Step::Place {
                    at: b,
                    kind: k2,
                    side: s2,
                    ..
                },
            ) => a == b && k1 == k2 && s1 == s2,
            _ => false,
        }
    }
}

/// A full turn: an ordered chain of steps executed (and undone) as one
/// transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    steps: SmallVec<[Step; MAX_STEPS]>,
}

impl Move {
    /// Plain move or capture from `from` to `to`
    pub fn new(from: Position, to: Position) -> Move {
        Move::from_step(Step::relocate(from, to))
    }

    pub fn from_step(step: Step) -> Move {
        let mut steps = SmallVec::new();
        steps.push(step);
        Move { steps }
    }

    /// Append a step to the chain
    pub fn then(mut self, step: Step) -> Move {
        debug_assert!(self.steps.len() < MAX_STEPS, "move chain too long");
        self.steps.push(step);
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub(crate) fn steps_mut(&mut self) -> &mut [Step] {
        &mut self.steps
    }

    /// Origin of the leading step
    pub fn origin(&self) -> Option<Position> {
        self.steps.first().and_then(Step::origin)
    }

    /// Destination of the leading step
    pub fn dest(&self) -> Option<Position> {
        self.steps.first().and_then(Step::dest)
    }

    pub fn is_promotion(&self) -> bool {
        self.steps.iter().any(|s| matches!(s, Step::Place { .. }))
    }

    /// A removal somewhere other than the landing square: the en passant victim
    pub fn is_en_passant(&self) -> bool {
        let dest = self.dest();
        self.steps
            .iter()
            .any(|s| matches!(s, Step::Remove { at, .. } if Some(*at) != dest))
    }

    /// Opposing piece this move took, once the board has executed it
    pub fn taken(&self) -> Option<Piece> {
        let dest = self.dest();
        self.steps.iter().find_map(|s| match s {
            Step::Relocate { captured, .. } => *captured,
            Step::Remove { at, captured } if Some(*at) != dest => *captured,
            _ => None,
        })
    }

    /// Same chain of edits, ignoring the capture records
    pub fn same_plan(&self, other: &Move) -> bool {
        self.steps.len() == other.steps.len()
            && self
                .steps
                .iter()
                .zip(other.steps.iter())
                .all(|(a, b)| a.same_edit(b))
    }

    /// Copy of this move with every capture record cleared
    pub fn planned(&self) -> Move {
        let steps = self
            .steps
            .iter()
            .map(|s| match s {
                Step::Relocate { from, to, .. } => Step::relocate(*from, *to),
                Step::Remove { at, .. } => Step::remove(*at),
                Step::Place { at, kind, side, .. } => Step::place(*at, *kind, *side),
            })
            .collect();
        Move { steps }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.origin(), self.dest()) {
            (Some(a), Some(b)) => write!(f, "{a}{b}"),
            (Some(a), None) => write!(f, "{a}x"),
            (None, Some(b)) => write!(f, "@{b}"),
            (None, None) => f.write_str("-"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum Status {
    /// Contains the winning side
    Checkmate(Side),
    Stalemate,
    /// The game driver stopped after its ply cap
    MoveLimit,
}
