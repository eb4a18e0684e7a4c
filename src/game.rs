use chrono::prelude::*;
use rand::prelude::*;
use tracing::{debug, info};

use crate::board::Board;
use crate::error::{EngineError, EngineResult};
use crate::types::{Move, Side, Status};

/// Something that picks moves: a human front end, an engine, a script.
///
/// A player only ever sees a snapshot of the game board, never the board the
/// game is played on.
pub trait Player {
    fn name(&self) -> &str;

    /// Choose a move for `side`, or `None` if there is nothing to play
    fn take_turn(&mut self, board: Board, side: Side) -> Option<Move>;
}

/// Plays a uniformly random legal move
pub struct RandomPlayer {
    name: String,
    rng: StdRng,
}

impl RandomPlayer {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible player
    pub fn seeded(name: &str, seed: u64) -> Self {
        Self {
            name: name.to_string(),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Player for RandomPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn take_turn(&mut self, mut board: Board, side: Side) -> Option<Move> {
        let moves = board.all_moves(side, true);
        moves.as_slice().choose(&mut self.rng).cloned()
    }
}

/// Drives a game: owns the authoritative board, asks players for moves in
/// turn and checks for the end of the game after each one.
pub struct Game {
    board: Board,
    turn: Side,
    status: Option<Status>,
    message: String,
    game_start_time: DateTime<Local>,
    silent: bool,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    pub fn new() -> Self {
        Game::from_board(Board::new(), Side::White)
    }

    pub fn new_silent() -> Self {
        Self {
            silent: true,
            ..Game::new()
        }
    }

    /// Continue from an existing board with `turn` to move
    pub fn from_board(board: Board, turn: Side) -> Self {
        let mut game = Self {
            board,
            turn,
            status: None,
            message: String::new(),
            game_start_time: Local::now(),
            silent: false,
        };
        game.status = game.board.status(turn);
        game.announce();
        game
    }

    pub fn set_silent(&mut self, silent: bool) {
        self.silent = silent;
    }

    /// Snapshot of the game board. Changing it does not affect the game.
    pub fn board(&self) -> Board {
        self.board.copy()
    }

    /// Side to move
    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn status(&self) -> Option<Status> {
        self.status
    }

    /// Current status message
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_done(&self) -> bool {
        self.status.is_some()
    }

    pub fn winner(&self) -> Option<Side> {
        match self.status {
            Some(Status::Checkmate(side)) => Some(side),
            _ => None,
        }
    }

    pub fn plies(&self) -> usize {
        self.board.plies()
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.game_start_time
    }

    fn set_message(&mut self, message: String) {
        info!("{}", message);
        self.message = message;
    }

    fn announce(&mut self) {
        let message = match self.status {
            None => format!("{}'s turn.", capitalize(self.turn.to_human())),
            Some(Status::Checkmate(winner)) => {
                format!("{} wins!", capitalize(winner.to_human()))
            }
            Some(Status::Stalemate) => "Stalemate!".to_string(),
            Some(Status::MoveLimit) => format!("Stopped after {} moves.", self.board.plies()),
        };
        self.set_message(message);
    }

    /// Play `mv` for the side to move.
    ///
    /// The move only has to match a legal move by its steps; capture records
    /// on it are ignored. Returns the status of the game afterwards.
    pub fn play_move(&mut self, mv: &Move) -> EngineResult<Option<Status>> {
        if let Some(status) = self.status {
            return Err(EngineError::NoMoveAvailable(format!("game is over: {status:?}")));
        }
        let legal = self.board.all_moves(self.turn, true);
        let chosen = legal
            .iter()
            .find(|m| m.same_plan(mv))
            .cloned()
            .ok_or_else(|| EngineError::IllegalMove {
                mv: mv.to_string(),
                side: self.turn.to_string(),
            })?;

        if !self.silent {
            println!("move {}: {}", self.board.plies() / 2 + 1, self.board.describe(&chosen));
        }
        debug!(side = %self.turn, mv = %chosen, "playing move");
        self.board.make_move(chosen)?;
        if !self.silent {
            self.board.draw_to_terminal();
            println!();
        }

        self.turn = self.turn.other();
        self.status = self.board.status(self.turn);
        self.announce();
        Ok(self.status)
    }

    /// Ask `player` for a move for the side to move and play it
    pub fn take_turn(&mut self, player: &mut dyn Player) -> EngineResult<Option<Status>> {
        let side = self.turn;
        let mv = player.take_turn(self.board(), side).ok_or_else(|| {
            EngineError::NoMoveAvailable(format!("{} returned no move for {side}", player.name()))
        })?;
        self.play_move(&mv)
    }

    /// Alternate the two players until the game ends or `max_plies` moves
    /// have been played in total.
    pub fn play(
        &mut self,
        white: &mut dyn Player,
        black: &mut dyn Player,
        max_plies: usize,
    ) -> EngineResult<Status> {
        loop {
            if let Some(status) = self.status {
                return Ok(status);
            }
            if self.board.plies() >= max_plies {
                self.status = Some(Status::MoveLimit);
                self.announce();
                return Ok(Status::MoveLimit);
            }
            match self.turn {
                Side::White => self.take_turn(white)?,
                Side::Black => self.take_turn(black)?,
            };
        }
    }

    /// Take back the last move; the game is open again afterwards
    pub fn undo(&mut self) -> Option<Move> {
        let mv = self.board.undo()?;
        self.turn = self.turn.other();
        self.status = None;
        self.announce();
        Some(mv)
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
