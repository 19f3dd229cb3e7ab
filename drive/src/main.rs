use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use roadbuilder::{Board, BoardSnapshot, PathValidator, PuzzleConfig};

/// Load a road puzzle, optionally shuffle it, and report whether the car gets through.
#[derive(Parser, Debug)]
#[command(name = "drive")]
struct Args {
    /// Puzzle configuration (JSON); the bundled one if omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Board to check (JSON rows of tile keys, null for the gap); the configuration's layout if omitted.
    #[arg(short, long)]
    board: Option<PathBuf>,

    /// Random slides to apply before checking.
    #[arg(short, long, default_value_t = 0)]
    shuffle: usize,

    /// Seed for the shuffle.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// List the one-sided entries of the connection table.
    #[arg(long, default_value_t = false)]
    asymmetries: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => PuzzleConfig::from_path(path).with_context(|| format!("loading {}", path.display()))?,
        None => PuzzleConfig::bundled().context("loading bundled configuration")?,
    };
    let table = config.table().context("resolving connection table")?;

    let mut board = match &args.board {
        Some(path) => {
            let json = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            let snapshot: BoardSnapshot = serde_json::from_str(&json)?;
            Board::from_snapshot(&table, &snapshot)?
        }
        None => config.board(&table)?,
    };

    if args.shuffle > 0 {
        info!("shuffling with {} slides, seed {}", args.shuffle, args.seed);
        board.shuffle(&mut StdRng::seed_from_u64(args.seed), args.shuffle);
    }

    if args.asymmetries {
        for (tile, side, neighbor) in table.asymmetries() {
            println!("{} lists {} on its {} side, but not the other way round", table.tile(tile)?.key(), table.tile(neighbor)?.key(), side);
        }
    }

    print!("{}", board.render(&table)?);

    let start = config.settings.start;
    let end = config.settings.end;
    match PathValidator::new(&table).route(&board, start, end)? {
        Some(route) => {
            let steps = route.iter().map(ToString::to_string).collect::<Vec<_>>().join(" -> ");
            println!("road holds: {}", steps);
        }
        None => println!("no road from {} to {}", start, end),
    }

    Ok(())
}
