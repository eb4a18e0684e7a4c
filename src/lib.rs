pub mod error;
pub mod types;
pub mod movelist;
pub mod movegen;
pub mod board;
pub mod game;
pub mod perft;
