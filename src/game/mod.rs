use crate::core::{Board, Deadline, Mark, Move};
use crate::display::{render_board, DisplayState};
use crate::logic::{available_moves, outcome, GameOutcome};
use crate::player::PlayerController;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnResult {
    Continue,
    Finished(GameOutcome),
    Resigned(Mark),
}

pub struct Game {
    pub board: Board,
    pub current: Mark,
    pub history: Vec<Move>,
    /// 1 手あたりの持ち時間。None なら無制限
    pub time_limit: Option<Duration>,
}

impl Game {
    pub fn new(board: Board, time_limit: Option<Duration>) -> Self {
        let current = board.next_mark();
        Game {
            board,
            current,
            history: Vec::new(),
            time_limit,
        }
    }

    fn turn_deadline(&self) -> Deadline {
        match self.time_limit {
            Some(limit) => Deadline::starting_now(limit),
            None => Deadline::unlimited(),
        }
    }

    /// 現在の手番を 1 手進める
    pub fn step(&mut self, controller: &dyn PlayerController) -> anyhow::Result<TurnResult> {
        if let Some(result) = outcome(&self.board) {
            return Ok(TurnResult::Finished(result));
        }

        let moves = available_moves(&self.board);
        let deadline = self.turn_deadline();

        let Some(mv) = controller.choose_move(&mut self.board, &moves, &deadline) else {
            tracing::info!(player = controller.name(), mark = %self.current, "player resigned");
            return Ok(TurnResult::Resigned(self.current));
        };

        self.board.place(mv, self.current).with_context(|| {
            format!(
                "{} ({}) chose an illegal move {}",
                controller.name(),
                self.current,
                mv
            )
        })?;
        self.history.push(mv);

        if let Some(result) = outcome(&self.board) {
            tracing::info!(result = ?result, moves = self.history.len(), "game finished");
            return Ok(TurnResult::Finished(result));
        }
        self.current = self.current.opponent();
        Ok(TurnResult::Continue)
    }

    pub fn play(
        &mut self,
        p1: &dyn PlayerController,
        p2: &dyn PlayerController,
        state: &mut DisplayState,
    ) -> anyhow::Result<GameOutcome> {
        loop {
            let controller = match self.current {
                Mark::X => p1,
                Mark::O => p2,
            };

            state.last_move = self.history.last().copied();
            state.status_msg = Some(format!("{}'s turn ({})", controller.name(), self.current));
            render_board(&self.board, state)?;

            let result = self.step(controller)?;

            let finished = match result {
                TurnResult::Continue => continue,
                TurnResult::Finished(result) => result,
                TurnResult::Resigned(mark) => GameOutcome::Win(mark.opponent()),
            };

            state.last_move = self.history.last().copied();
            state.status_msg = Some(match (finished, result) {
                (GameOutcome::Win(mark), TurnResult::Resigned(_)) => format!(
                    "{} resigned. {} ({}) is the Winner!",
                    controller.name(),
                    state.names[mark.index()],
                    mark
                ),
                (GameOutcome::Win(mark), _) => {
                    format!("{} ({}) is the Winner!", state.names[mark.index()], mark)
                }
                (GameOutcome::Draw, _) => "The game is a draw!".to_string(),
            });
            render_board(&self.board, state)?;
            return Ok(finished);
        }
    }
}

/// 対局をまたいだ成績
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub games_played: usize,
    /// [X, O] の勝利数
    pub wins: [usize; 2],
    pub draws: usize,
    pub total_moves: usize,
}

impl SessionStats {
    pub fn record(&mut self, result: GameOutcome, moves: usize) {
        self.games_played += 1;
        self.total_moves += moves;
        match result {
            GameOutcome::Win(mark) => self.wins[mark.index()] += 1,
            GameOutcome::Draw => self.draws += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{MinimaxAI, RandomAI};

    /// 決められた順に着手するだけのプレイヤー
    struct Scripted {
        moves: std::cell::RefCell<Vec<Move>>,
    }

    impl Scripted {
        fn new(cells: &[usize]) -> Self {
            Self {
                moves: std::cell::RefCell::new(cells.iter().rev().map(|&c| Move(c)).collect()),
            }
        }
    }

    impl PlayerController for Scripted {
        fn choose_move(&self, _: &mut Board, _: &[Move], _: &Deadline) -> Option<Move> {
            self.moves.borrow_mut().pop()
        }
        fn name(&self) -> &str {
            "Scripted"
        }
        fn is_local(&self) -> bool {
            true
        }
    }

    fn run(game: &mut Game, p1: &dyn PlayerController, p2: &dyn PlayerController) -> TurnResult {
        loop {
            let controller = if game.current == Mark::X { p1 } else { p2 };
            match game.step(controller).unwrap() {
                TurnResult::Continue => {}
                other => return other,
            }
        }
    }

    #[test]
    fn scripted_game_ends_in_win() {
        let mut game = Game::new(Board::new(3, 3).unwrap(), None);
        let x = Scripted::new(&[1, 2, 3]);
        let o = Scripted::new(&[4, 5]);
        assert_eq!(
            run(&mut game, &x, &o),
            TurnResult::Finished(GameOutcome::Win(Mark::X))
        );
        assert_eq!(game.history, vec![Move(1), Move(4), Move(2), Move(5), Move(3)]);
    }

    #[test]
    fn exhausted_script_resigns() {
        let mut game = Game::new(Board::new(2, 2).unwrap(), None);
        let x = Scripted::new(&[1]);
        let o = Scripted::new(&[]);
        assert_eq!(run(&mut game, &x, &o), TurnResult::Resigned(Mark::O));
    }

    #[test]
    fn illegal_move_is_rejected() {
        let mut game = Game::new(Board::new(3, 3).unwrap(), None);
        let x = Scripted::new(&[5, 5]);
        let o = Scripted::new(&[5]);
        assert!(game.step(&x).unwrap() == TurnResult::Continue);
        assert!(game.step(&o).is_err());
        assert_eq!(game.current, Mark::O);
        assert_eq!(game.history.len(), 1);
    }

    #[test]
    fn minimax_never_loses_to_random() {
        for _ in 0..20 {
            let mut game = Game::new(Board::new(3, 3).unwrap(), None);
            let random = RandomAI::new("Random");
            let engine = MinimaxAI::new(Mark::O, "Computer");
            let result = run(&mut game, &random, &engine);
            assert_ne!(result, TurnResult::Finished(GameOutcome::Win(Mark::X)));
        }
    }

    #[test]
    fn stats_accumulate() {
        let mut stats = SessionStats::default();
        stats.record(GameOutcome::Win(Mark::X), 5);
        stats.record(GameOutcome::Win(Mark::X), 7);
        stats.record(GameOutcome::Draw, 9);
        assert_eq!(stats.games_played, 3);
        assert_eq!(stats.wins, [2, 0]);
        assert_eq!(stats.draws, 1);
        assert_eq!(stats.total_moves, 21);
    }
}
