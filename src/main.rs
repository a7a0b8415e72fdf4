use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tictactoe_ai::core::{Board, Mark, MAX_BOARD_SIZE, MIN_BOARD_SIZE};
use tictactoe_ai::display::{render_statistics, DisplayState};
use tictactoe_ai::game::{Game, SessionStats};
use tictactoe_ai::player::ai::AIConfig;
use tictactoe_ai::player::{MinimaxAI, PlayerController, TerminalController};
use tictactoe_ai::selfplay::{run_selfplay, save_report, OpponentKind, SelfPlayConfig};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Opponent {
    Minimax,
    Random,
}

#[derive(Debug, Parser)]
#[clap(about = "Tic-tac-toe on an arbitrary board with an alpha-beta minimax AI")]
struct Args {
    #[clap(long, default_value_t = 3, value_parser = board_size)]
    rows: usize,
    #[clap(long, default_value_t = 3, value_parser = board_size)]
    cols: usize,
    /// Human players: 0 for AI vs AI, 1 for human vs AI, 2 for two humans
    #[clap(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(0..=2))]
    players: u8,
    /// Player names, in order (repeatable)
    #[clap(long = "name")]
    names: Vec<String>,
    #[clap(long, default_value_t = 1)]
    games: usize,
    /// Per-turn search budget, overrides the config file
    #[clap(long)]
    time_limit_ms: Option<u64>,
    #[clap(long)]
    config: Option<PathBuf>,
    /// Second AI in AI vs AI mode
    #[clap(long, value_enum, default_value_t = Opponent::Minimax)]
    opponent: Opponent,
    /// Play AI vs AI games on all cores
    #[clap(long)]
    parallel: bool,
    /// Write an AI vs AI report to this directory
    #[clap(long)]
    save_report: Option<PathBuf>,
}

fn board_size(s: &str) -> Result<usize, String> {
    let size: usize = s.parse().map_err(|_| format!("'{}' is not a number", s))?;
    if (MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
        Ok(size)
    } else {
        Err(format!(
            "enter a number between {} and {}",
            MIN_BOARD_SIZE, MAX_BOARD_SIZE
        ))
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut ai_config = match &args.config {
        Some(path) => AIConfig::load_from(path)?,
        None => AIConfig::load_or_default(),
    };
    if let Some(ms) = args.time_limit_ms {
        ai_config.search.turn_time_limit_ms = ms;
    }
    tracing::debug!(?ai_config, "configuration loaded");

    if args.players == 0 {
        run_ai_vs_ai(&args, &ai_config)
    } else {
        run_local(&args, &ai_config)
    }
}

fn run_ai_vs_ai(args: &Args, ai_config: &AIConfig) -> anyhow::Result<()> {
    let config = SelfPlayConfig {
        num_games: args.games,
        rows: args.rows,
        cols: args.cols,
        opponent: match args.opponent {
            Opponent::Minimax => OpponentKind::Minimax,
            Opponent::Random => OpponentKind::Random,
        },
        time_limit: Some(ai_config.search.turn_time_limit()),
        fallback_to_random: ai_config.search.fallback_to_random,
        parallel: args.parallel,
    };

    let start = Instant::now();
    let stats = run_selfplay(&config)?;
    render_statistics(&stats.session_stats(), start.elapsed())?;
    println!("Avg Moves: {:.1}", stats.avg_moves);

    if let Some(dir) = &args.save_report {
        let path = save_report(&stats, dir)?;
        println!("Report saved to {}", path.display());
    }
    Ok(())
}

fn run_local(args: &Args, ai_config: &AIConfig) -> anyhow::Result<()> {
    let name = |i: usize, fallback: &str| {
        args.names
            .get(i)
            .cloned()
            .unwrap_or_else(|| fallback.to_string())
    };

    let (p1, p2, names): (Box<dyn PlayerController>, Box<dyn PlayerController>, [String; 2]) =
        if args.players == 1 {
            let human = name(0, "Player 1");
            let computer = "Computer".to_string();
            (
                Box::new(TerminalController::new(Mark::X, &human)),
                Box::new(
                    MinimaxAI::new(Mark::O, &computer)
                        .with_fallback(ai_config.search.fallback_to_random),
                ),
                [human, computer],
            )
        } else {
            let first = name(0, "Player 1");
            let second = name(1, "Player 2");
            (
                Box::new(TerminalController::new(Mark::X, &first)),
                Box::new(TerminalController::new(Mark::O, &second)),
                [first, second],
            )
        };

    let mut stats = SessionStats::default();
    let mut state = DisplayState::new(names);
    let start = Instant::now();

    for _ in 0..args.games {
        let board = Board::new(args.rows, args.cols)?;
        let mut game = Game::new(board, Some(ai_config.search.turn_time_limit()));
        let outcome = game.play(p1.as_ref(), p2.as_ref(), &mut state)?;
        stats.record(outcome, game.history.len());

        if stats.games_played < args.games {
            println!("Game Count: {}", stats.games_played);
            for (i, wins) in stats.wins.iter().enumerate() {
                println!("Player {} Win Count: {}", i + 1, wins);
            }
            std::thread::sleep(Duration::from_secs(2));
        }
    }

    render_statistics(&stats, start.elapsed())?;
    Ok(())
}
