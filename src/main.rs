//! Self-play runner: two random players on a standard board.
//!
//! Usage: cargo run --release -- --seed 42 --max-moves 120
//!        cargo run --release -- --perft 4

use std::time::Instant;

use clap::Parser;
use color_eyre::eyre::eyre;
use tracing::info;
use tracing_subscriber::EnvFilter;

use chess_rules::board::Board;
use chess_rules::game::{Game, RandomPlayer};
use chess_rules::perft::{expected_node_count, run_perft_parallel};
use chess_rules::types::Side;

#[derive(Parser, Debug)]
#[command(name = "chess")]
#[command(about = "Play random self-play games with the chess rules engine")]
struct Args {
    /// Stop the game after this many moves (plies)
    #[arg(long, default_value_t = 200)]
    max_moves: usize,

    /// Seed for the random players; entropy when left out
    #[arg(long)]
    seed: Option<u64>,

    /// Do not print the board after every move
    #[arg(short, long)]
    quiet: bool,

    /// Count the leaf nodes to this depth from the start position instead of playing
    #[arg(long)]
    perft: Option<u8>,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    if let Some(depth) = args.perft {
        let start = Instant::now();
        let nodes = run_perft_parallel(&Board::new(), Side::White, depth);
        info!(depth, nodes, elapsed = ?start.elapsed(), "perft done");
        if let Some(expected) = expected_node_count(depth) {
            if expected != nodes {
                return Err(eyre!("perft({depth}) gave {nodes} nodes, expected {expected}"));
            }
        }
        println!("perft({depth}) = {nodes}");
        return Ok(());
    }

    let (mut white, mut black) = match args.seed {
        Some(seed) => (
            RandomPlayer::seeded("white", seed),
            RandomPlayer::seeded("black", seed.wrapping_add(1)),
        ),
        None => (RandomPlayer::new("white"), RandomPlayer::new("black")),
    };

    let mut game = Game::new();
    game.set_silent(args.quiet);
    info!(started = %game.started_at().format("%Y-%m-%d %H:%M:%S"), "new game");
    if !args.quiet {
        game.board().draw_to_terminal();
        println!();
    }

    let status = game.play(&mut white, &mut black, args.max_moves)?;
    info!(?status, plies = game.plies(), "game over");
    println!("{}", game.message());
    Ok(())
}
