//! End to end checks of the rules through the public API.

use chess_rules::board::Board;
use chess_rules::error::EngineError;
use chess_rules::game::{Game, Player, RandomPlayer};
use chess_rules::types::{Move, Piece, PieceKind, Position, Side, Status};
use pretty_assertions::assert_eq;

fn pos(s: &str) -> Position {
    s.parse().unwrap()
}

fn board_with(pieces: &[(&str, char)]) -> Board {
    let mut b = Board::empty();
    for (sq, c) in pieces {
        b.put(pos(sq), Piece::from_char(*c).unwrap()).unwrap();
    }
    b
}

fn play(b: &mut Board, side: Side, from: &str, to: &str) {
    let mv = b
        .all_moves(side, true)
        .find(pos(from), pos(to))
        .cloned()
        .unwrap_or_else(|| panic!("{from}{to} is not legal for {side}"));
    b.make_move(mv).unwrap();
}

#[test]
fn scholars_mate() {
    let mut b = Board::new();
    play(&mut b, Side::White, "e2", "e4");
    play(&mut b, Side::Black, "e7", "e5");
    play(&mut b, Side::White, "f1", "c4");
    play(&mut b, Side::Black, "b8", "c6");
    play(&mut b, Side::White, "d1", "h5");
    play(&mut b, Side::Black, "g8", "f6");
    play(&mut b, Side::White, "h5", "f7");

    assert!(b.check(Side::Black));
    assert!(b.checkmate(Side::Black));
    assert!(!b.stalemate(Side::Black));
    assert_eq!(b.status(Side::Black), Some(Status::Checkmate(Side::White)));
    assert_eq!(b.move_count(Side::Black), 0);
}

#[test]
fn unwinding_a_game_restores_the_start() {
    let mut b = Board::new();
    let line = [
        ("e2", "e4"),
        ("d7", "d5"),
        ("e4", "d5"),
        ("d8", "d5"),
        ("b1", "c3"),
        ("d5", "a2"),
        ("a1", "a2"),
    ];
    let mut side = Side::White;
    for (from, to) in line {
        play(&mut b, side, from, to);
        side = side.other();
    }
    assert_eq!(b.plies(), 7);
    assert_eq!(b.find_queen(Side::Black), None);

    while b.undo().is_some() {}
    assert_eq!(b, Board::new());
}

#[test]
fn promotion_round_trip() {
    // 8 . . . . k . . .
    // 7 . P . . . . . .
    // 1 . . . . K . . .
    let mut b = board_with(&[("e8", 'k'), ("b7", 'P'), ("e1", 'K')]);
    let before = b.copy();

    let mv = b.moves_from(pos("b7"), true).unwrap().find(pos("b7"), pos("b8")).cloned().unwrap();
    assert!(mv.is_promotion());
    assert_eq!(mv.steps().len(), 3);
    b.make_move(mv).unwrap();

    let queen = b.piece_at(pos("b8")).copied().unwrap();
    assert_eq!(queen.kind, PieceKind::Queen);
    assert_eq!(queen.side, Side::White);
    assert!(b.is_empty(pos("b7")));
    // the new queen checks along the back rank
    assert!(b.check(Side::Black));

    b.undo();
    assert_eq!(b, before);
}

#[test]
fn en_passant_only_right_after_the_double_step() {
    let mut b = Board::new();
    play(&mut b, Side::White, "e2", "e4");
    play(&mut b, Side::Black, "a7", "a6");
    play(&mut b, Side::White, "e4", "e5");
    play(&mut b, Side::Black, "d7", "d5");

    let ep = b.moves_from(pos("e5"), true).unwrap().find(pos("e5"), pos("d6")).cloned();
    let ep = ep.expect("en passant should be available");
    assert!(ep.is_en_passant());

    // waiting a move gives the right up
    let mut later = b.copy();
    play(&mut later, Side::White, "h2", "h3");
    play(&mut later, Side::Black, "h7", "h6");
    assert!(later
        .moves_from(pos("e5"), true)
        .unwrap()
        .find(pos("e5"), pos("d6"))
        .is_none());

    b.make_move(ep).unwrap();
    assert!(b.is_empty(pos("d5")));
    assert_eq!(b.piece_at(pos("d6")).map(|p| p.kind), Some(PieceKind::Pawn));
    b.undo();
    assert_eq!(b.piece_at(pos("d5")).map(|p| p.side), Some(Side::Black));
}

#[test]
fn copies_are_independent() {
    let mut b = Board::new();
    play(&mut b, Side::White, "g1", "f3");
    let mut c = b.copy();
    assert_eq!(c, b);

    play(&mut c, Side::Black, "g8", "f6");
    assert_eq!(b.plies(), 1);
    assert_eq!(c.plies(), 2);
    assert!(b.piece_at(pos("g8")).is_some());
}

#[test]
fn setup_is_closed_after_the_first_move() {
    let mut b = Board::new();
    play(&mut b, Side::White, "e2", "e4");
    let err = b.put(pos("e5"), Piece::new(PieceKind::Queen, Side::Black)).unwrap_err();
    assert_eq!(err, EngineError::SetupAfterMoves { plies: 1 });
    assert_eq!(
        b.put(Position::new(8, 0), Piece::new(PieceKind::Queen, Side::Black)),
        Err(EngineError::SetupAfterMoves { plies: 1 })
    );
    assert_eq!(
        Board::empty().put(Position::new(8, 0), Piece::new(PieceKind::Queen, Side::Black)),
        Err(EngineError::OutOfRange(Position::new(8, 0)))
    );
}

#[test]
fn piece_factory() {
    assert_eq!(Piece::create("Queen", Side::Black).unwrap().kind, PieceKind::Queen);
    assert_eq!(Piece::create("knight", Side::White).unwrap().kind, PieceKind::Knight);
    assert!(matches!(
        Piece::create("archbishop", Side::White),
        Err(EngineError::UnknownPiece(_))
    ));
}

#[test]
fn board_survives_serde() {
    let mut b = Board::new();
    play(&mut b, Side::White, "d2", "d4");
    let json = serde_json::to_string(&b).unwrap();
    let back: Board = serde_json::from_str(&json).unwrap();
    assert_eq!(back, b);
}

/// Always tries to move the king two squares forward, which is never legal
struct Cheater;

impl Player for Cheater {
    fn name(&self) -> &str {
        "cheater"
    }

    fn take_turn(&mut self, board: Board, side: Side) -> Option<Move> {
        let king = board.find_king(side)?;
        Some(Move::new(king, king.relative(0, 2 * side.forward())))
    }
}

#[test]
fn game_rejects_illegal_player_moves() {
    let mut game = Game::new_silent();
    let mut white = Cheater;
    let mut black = RandomPlayer::seeded("black", 3);
    let err = game.play(&mut white, &mut black, 10).unwrap_err();
    assert!(matches!(err, EngineError::IllegalMove { .. }));
    assert_eq!(game.plies(), 0);
}

#[test]
fn seeded_games_are_reproducible() {
    let run = || {
        let mut game = Game::new_silent();
        let mut white = RandomPlayer::seeded("white", 42);
        let mut black = RandomPlayer::seeded("black", 43);
        let status = game.play(&mut white, &mut black, 80).unwrap();
        (status, game.board())
    };
    let (status_a, board_a) = run();
    let (status_b, board_b) = run();
    assert_eq!(status_a, status_b);
    assert_eq!(board_a, board_b);
    assert!(board_a.plies() <= 80);
    if status_a == Status::MoveLimit {
        assert_eq!(board_a.plies(), 80);
    }
}
