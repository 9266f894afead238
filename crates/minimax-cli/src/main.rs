//! Minimax chess engine front end.
//!
//! Searches positions, validates the move generator with perft, and plays
//! games between this engine and an external UCI engine.

mod config;
mod uci;

use anyhow::Context;
use chess_core::FenParser;
use chess_engine::movegen::perft::{perft, perft_divide};
use chess_engine::{Board, Game};
use chess_search::{MinimaxSuggester, MoveSuggester, Searcher};
use clap::{Parser, Subcommand, ValueEnum};
use config::CliConfig;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use uci::UciSuggester;

#[derive(Parser)]
#[command(name = "minimax")]
#[command(about = "Minimax chess engine with alpha-beta pruning")]
struct Cli {
    /// Configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the best move for a position
    BestMove {
        /// Position in FEN (defaults to the starting position)
        #[arg(long)]
        fen: Option<String>,
        /// Search depth in plies (overrides the config file)
        #[arg(short, long)]
        depth: Option<u32>,
    },
    /// Count leaf nodes of the legal move tree
    Perft {
        /// Position in FEN (defaults to the starting position)
        #[arg(long)]
        fen: Option<String>,
        /// Depth in plies
        #[arg(short, long, default_value = "3")]
        depth: u32,
        /// Print the count below each root move
        #[arg(long)]
        divide: bool,
    },
    /// Play a game between two players
    Play {
        /// Player for White
        #[arg(long, value_enum, default_value = "minimax")]
        white: PlayerKind,
        /// Player for Black
        #[arg(long, value_enum, default_value = "minimax")]
        black: PlayerKind,
        /// Stop after this many half-moves
        #[arg(long, default_value = "200")]
        max_plies: usize,
        /// Starting position in FEN
        #[arg(long)]
        fen: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PlayerKind {
    /// This engine's minimax search
    Minimax,
    /// The external UCI engine from the config file
    Uci,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(CliConfig::default_path);
    let config = CliConfig::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    match cli.command {
        Commands::BestMove { fen, depth } => best_move(&config, fen, depth),
        Commands::Perft { fen, depth, divide } => run_perft(fen, depth, divide),
        Commands::Play {
            white,
            black,
            max_plies,
            fen,
        } => play(&config, white, black, max_plies, fen),
    }
}

fn load_board(fen: Option<String>) -> anyhow::Result<Board> {
    let fen = fen.unwrap_or_else(|| FenParser::STARTPOS.to_string());
    Board::from_fen(&fen).with_context(|| format!("invalid position '{fen}'"))
}

fn best_move(config: &CliConfig, fen: Option<String>, depth: Option<u32>) -> anyhow::Result<()> {
    let mut board = load_board(fen)?;
    let mut search = config.search;
    if let Some(depth) = depth {
        search.depth = depth;
    }

    let start = Instant::now();
    let outcome = Searcher::new(search).search(&mut board)?;
    tracing::info!(
        depth = search.depth,
        nodes = outcome.nodes,
        score = outcome.score,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "search finished"
    );
    println!("{}", outcome.best_move);
    Ok(())
}

fn run_perft(fen: Option<String>, depth: u32, divide: bool) -> anyhow::Result<()> {
    let mut board = load_board(fen)?;
    let start = Instant::now();
    let nodes = if divide {
        let results = perft_divide(&mut board, depth);
        for (mv, count) in &results {
            println!("{mv}: {count}");
        }
        results.iter().map(|(_, count)| count).sum::<u64>()
    } else {
        perft(&mut board, depth)
    };
    tracing::info!(depth, elapsed_ms = start.elapsed().as_millis() as u64, "perft finished");
    println!("{nodes}");
    Ok(())
}

fn player(config: &CliConfig, kind: PlayerKind) -> anyhow::Result<Box<dyn MoveSuggester>> {
    Ok(match kind {
        PlayerKind::Minimax => Box::new(MinimaxSuggester::new(config.search)),
        PlayerKind::Uci => {
            let engine = UciSuggester::spawn(&config.uci)
                .with_context(|| format!("starting {}", config.uci.path.display()))?;
            tracing::info!(engine = engine.name(), "external engine connected");
            Box::new(engine)
        }
    })
}

fn play(
    config: &CliConfig,
    white: PlayerKind,
    black: PlayerKind,
    max_plies: usize,
    fen: Option<String>,
) -> anyhow::Result<()> {
    let board = load_board(fen)?;
    let mut game = Game::from_board(board, config.rules);
    let mut players = [player(config, white)?, player(config, black)?];

    while !game.is_game_over() && game.ply_count() < max_plies {
        let side = game.side_to_move();
        let position = game.to_fen();
        let answer = players[side.index()]
            .best_move(&position)
            .with_context(|| format!("{side} could not move in {position}"))?;
        game.apply_coordinate_move(&answer)
            .with_context(|| format!("{side} answered {answer} in {position}"))?;
        tracing::debug!(%side, mv = %answer, "move played");
    }

    println!("{}", game.transcript());
    match game.result() {
        Some(result) => println!("{result} ({})", game.game_over_reason()),
        None => println!(
            "* (stopped after {} plies, {} to move)",
            game.ply_count(),
            game.side_to_move()
        ),
    }
    Ok(())
}
