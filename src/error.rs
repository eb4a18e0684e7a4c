//! Error types for the rules engine
//!
//! Speculative queries (range checks, king lookups, move generation) never
//! fail: they answer `None`, `false` or an empty list. Errors are reserved for
//! caller mistakes at the edges: board setup, parsing and the game driver.

use thiserror::Error;

use crate::types::Position;

/// Errors that can occur around the engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Square outside the 8x8 board
    #[error("Position {0:?} is off the board")]
    OutOfRange(Position),

    /// A move tried to relocate a piece from an empty square
    #[error("No piece on {0} to move")]
    EmptySquare(Position),

    /// Pieces can only be put on a board before any move was made
    #[error("Cannot set up pieces after {plies} move(s) were played")]
    SetupAfterMoves { plies: usize },

    /// Piece name that the factory cannot build
    #[error("Unknown piece name `{0}`")]
    UnknownPiece(String),

    /// Square text that is not of the form `e4`
    #[error("Cannot parse square `{0}`")]
    BadSquare(String),

    /// Move that is not among the legal moves of the side to move
    #[error("Illegal move {mv} for {side}")]
    IllegalMove { mv: String, side: String },

    /// The game is already decided, or the player had nothing to play
    #[error("No move available: {0}")]
    NoMoveAvailable(String),
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
