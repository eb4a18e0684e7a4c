use criterion::{black_box, criterion_group, criterion_main, Criterion};
use chess_rules::board::Board;
use chess_rules::perft::{run_perft_parallel, run_perft_test};
use chess_rules::types::{Position, Side};

/// Board after a short opening, so that copy has history to replay
fn opened_board() -> Board {
    let mut bo = Board::new();
    let line = [
        ("e2", "e4", Side::White),
        ("e7", "e5", Side::Black),
        ("g1", "f3", Side::White),
        ("b8", "c6", Side::Black),
        ("f1", "c4", Side::White),
        ("g8", "f6", Side::Black),
    ];
    for (from, to, side) in line {
        let from = Position::from_algebraic(from).unwrap();
        let to = Position::from_algebraic(to).unwrap();
        let mv = bo.all_moves(side, true).find(from, to).cloned().unwrap();
        bo.make_move(mv).unwrap();
    }
    bo
}

pub fn bench_legal_moves_from_start(c: &mut Criterion) {
    let mut bo = Board::new();
    c.bench_function("get legal moves from start", |b| {
        b.iter(|| bo.all_moves(black_box(Side::White), true))
    });
}

pub fn bench_pseudo_moves_from_start(c: &mut Criterion) {
    let bo = Board::new();
    c.bench_function("get pseudo moves from start", |b| {
        b.iter(|| bo.pseudo_moves(black_box(Side::White)))
    });
}

pub fn bench_legal_moves_after_opening(c: &mut Criterion) {
    let mut bo = opened_board();
    c.bench_function("get legal moves after opening", |b| {
        b.iter(|| bo.all_moves(black_box(Side::White), true))
    });
}

pub fn bench_copy_after_opening(c: &mut Criterion) {
    let bo = opened_board();
    c.bench_function("copy after opening", |b| b.iter(|| black_box(&bo).copy()));
}

pub fn bench_perft_3(c: &mut Criterion) {
    let mut group = c.benchmark_group("flat-sampling");
    group.sample_size(10);

    let mut bo = Board::new();
    group.bench_function("perft from start 3 ply", |b| {
        b.iter(|| run_perft_test(&mut bo, Side::White, black_box(3)))
    });
    let bo = Board::new();
    group.bench_function("parallel perft from start 3 ply", |b| {
        b.iter(|| run_perft_parallel(&bo, Side::White, black_box(3)))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_legal_moves_from_start,
    bench_pseudo_moves_from_start,
    bench_legal_moves_after_opening,
    bench_copy_after_opening,
    bench_perft_3,
);
criterion_main!(benches);
