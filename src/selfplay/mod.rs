use crate::core::{Board, Mark};
use crate::game::{Game, SessionStats, TurnResult};
use crate::logic::GameOutcome;
use crate::player::{MinimaxAI, PlayerController, RandomAI};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// O 側の AI の種類。X 側は常に minimax
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpponentKind {
    Minimax,
    Random,
}

#[derive(Debug, Clone)]
pub struct SelfPlayConfig {
    pub num_games: usize,
    pub rows: usize,
    pub cols: usize,
    pub opponent: OpponentKind,
    pub time_limit: Option<Duration>,
    pub fallback_to_random: bool,
    pub parallel: bool,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        Self {
            num_games: 1,
            rows: 3,
            cols: 3,
            opponent: OpponentKind::Minimax,
            time_limit: Some(Duration::from_secs(5)),
            fallback_to_random: true,
            parallel: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameResult {
    pub winner: Option<Mark>,
    pub moves: usize,
    pub time_ms: u128,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelfPlayStats {
    pub total_games: usize,
    pub x_wins: usize,
    pub o_wins: usize,
    pub draws: usize,
    pub avg_moves: f64,
    pub avg_time_ms: f64,
    pub board: String,
    pub opponent: OpponentKind,
    pub games: Vec<GameResult>,
}

impl SelfPlayStats {
    pub fn new(config: &SelfPlayConfig) -> Self {
        Self {
            total_games: 0,
            x_wins: 0,
            o_wins: 0,
            draws: 0,
            avg_moves: 0.0,
            avg_time_ms: 0.0,
            board: format!("{}x{}", config.rows, config.cols),
            opponent: config.opponent,
            games: Vec::new(),
        }
    }

    pub fn add_result(&mut self, result: GameResult) {
        self.total_games += 1;
        match result.winner {
            Some(Mark::X) => self.x_wins += 1,
            Some(Mark::O) => self.o_wins += 1,
            None => self.draws += 1,
        }
        self.games.push(result);
        self.recalculate_averages();
    }

    fn recalculate_averages(&mut self) {
        if self.games.is_empty() {
            return;
        }
        let total_moves: usize = self.games.iter().map(|g| g.moves).sum();
        let total_time: u128 = self.games.iter().map(|g| g.time_ms).sum();
        self.avg_moves = total_moves as f64 / self.games.len() as f64;
        self.avg_time_ms = total_time as f64 / self.games.len() as f64;
    }

    pub fn session_stats(&self) -> SessionStats {
        SessionStats {
            games_played: self.total_games,
            wins: [self.x_wins, self.o_wins],
            draws: self.draws,
            total_moves: self.games.iter().map(|g| g.moves).sum(),
        }
    }
}

pub fn run_selfplay(config: &SelfPlayConfig) -> anyhow::Result<SelfPlayStats> {
    let results: Vec<anyhow::Result<GameResult>> = if config.parallel {
        (1..=config.num_games)
            .into_par_iter()
            .map(|game_num| play_one(config, game_num))
            .collect()
    } else {
        (1..=config.num_games)
            .map(|game_num| play_one(config, game_num))
            .collect()
    };

    let mut stats = SelfPlayStats::new(config);
    for result in results {
        stats.add_result(result?);
    }
    Ok(stats)
}

fn play_one(config: &SelfPlayConfig, game_num: usize) -> anyhow::Result<GameResult> {
    let start_time = Instant::now();
    let board = Board::new(config.rows, config.cols)?;

    let p1: Box<dyn PlayerController> = Box::new(
        MinimaxAI::new(Mark::X, "AI-X").with_fallback(config.fallback_to_random),
    );
    let p2: Box<dyn PlayerController> = match config.opponent {
        OpponentKind::Minimax => Box::new(
            MinimaxAI::new(Mark::O, "AI-O").with_fallback(config.fallback_to_random),
        ),
        OpponentKind::Random => Box::new(RandomAI::new("Random-O")),
    };

    let mut game = Game::new(board, config.time_limit);
    let outcome = run_game_silent(&mut game, p1.as_ref(), p2.as_ref())?;

    let result = GameResult {
        winner: match outcome {
            GameOutcome::Win(mark) => Some(mark),
            GameOutcome::Draw => None,
        },
        moves: game.history.len(),
        time_ms: start_time.elapsed().as_millis(),
    };
    tracing::info!(
        game = game_num,
        winner = ?result.winner,
        moves = result.moves,
        time_ms = result.time_ms as u64,
        "self-play game completed"
    );
    Ok(result)
}

pub fn run_game_silent(
    game: &mut Game,
    p1: &dyn PlayerController,
    p2: &dyn PlayerController,
) -> anyhow::Result<GameOutcome> {
    loop {
        let controller = match game.current {
            Mark::X => p1,
            Mark::O => p2,
        };
        match game.step(controller)? {
            TurnResult::Continue => {}
            TurnResult::Finished(outcome) => return Ok(outcome),
            TurnResult::Resigned(mark) => return Ok(GameOutcome::Win(mark.opponent())),
        }
    }
}

/// `dir/report_<timestamp>.json` に書き出してパスを返す
pub fn save_report<P: AsRef<Path>>(stats: &SelfPlayStats, dir: P) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir.as_ref())?;

    let filename = dir.as_ref().join(format!(
        "report_{}.json",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    ));

    let file = std::fs::File::create(&filename)?;
    serde_json::to_writer_pretty(file, stats)?;
    Ok(filename)
}
