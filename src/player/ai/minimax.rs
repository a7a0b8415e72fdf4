//! Minimax search with alpha-beta pruning and a per-turn time budget.
//!
//! The board is mutated in place with `apply`/`undo` pairs and always restored
//! before a call returns, including when the deadline expires mid-search.
//! Running out of time is reported as [`SearchOutcome::TimedOut`] rather than
//! as a magic score, and [`select_move`] answers it with a random legal move.

use super::random::random_move;
use crate::core::{Board, Deadline, Mark, Move};
use crate::logic::{available_moves, evaluate, DRAW_SCORE};
use crate::player::PlayerController;
use std::cell::RefCell;

/// 評価値の範囲 [-10, 10] より外側の初期境界
pub const SCORE_INF: i32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Score(i32),
    TimedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchResult {
    Best { mv: Move, score: i32 },
    TimedOut,
    NoMoves,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub cutoffs: u64,
    /// 到達した最大の深さ (ルートの子が 1)
    pub max_depth: usize,
}

/// `maximizer` 視点の minimax 値を返す。`depth` は記録用で打ち切りには使わない
#[allow(clippy::too_many_arguments)]
pub fn search(
    board: &mut Board,
    maximizer: Mark,
    depth: usize,
    mut alpha: i32,
    mut beta: i32,
    is_maximizing: bool,
    deadline: &Deadline,
    stats: &mut SearchStats,
) -> SearchOutcome {
    if deadline.expired() {
        return SearchOutcome::TimedOut;
    }

    stats.nodes += 1;
    stats.max_depth = stats.max_depth.max(depth);

    let score = evaluate(board, maximizer);
    if score != DRAW_SCORE {
        return SearchOutcome::Score(score);
    }
    if board.is_full() {
        return SearchOutcome::Score(DRAW_SCORE);
    }

    let mark = if is_maximizing {
        maximizer
    } else {
        maximizer.opponent()
    };
    let mut best = if is_maximizing { -SCORE_INF } else { SCORE_INF };

    for mv in available_moves(board) {
        board.apply(mv, mark);
        let outcome = search(
            board,
            maximizer,
            depth + 1,
            alpha,
            beta,
            !is_maximizing,
            deadline,
            stats,
        );
        board.undo(mv);

        let value = match outcome {
            SearchOutcome::Score(v) => v,
            SearchOutcome::TimedOut => return SearchOutcome::TimedOut,
        };

        if is_maximizing {
            best = best.max(value);
            alpha = alpha.max(best);
        } else {
            best = best.min(value);
            beta = beta.min(best);
        }
        if beta <= alpha {
            stats.cutoffs += 1;
            break;
        }
    }

    SearchOutcome::Score(best)
}

/// ルートの各候補を順に評価し、より大きい値を見つけた最初の手を選ぶ
pub fn find_best_move(
    board: &mut Board,
    mark: Mark,
    deadline: &Deadline,
    stats: &mut SearchStats,
) -> SearchResult {
    let mut best: Option<(Move, i32)> = None;

    for mv in available_moves(board) {
        // alpha は現在の最善値。等しい値の手は選ばれないので枝刈りしても結果は同じ
        let alpha = best.map_or(-SCORE_INF, |(_, score)| score);

        board.apply(mv, mark);
        let outcome = search(board, mark, 1, alpha, SCORE_INF, false, deadline, stats);
        board.undo(mv);

        match outcome {
            SearchOutcome::TimedOut => return SearchResult::TimedOut,
            SearchOutcome::Score(score) => {
                if best.map_or(true, |(_, best_score)| score > best_score) {
                    best = Some((mv, score));
                }
            }
        }
    }

    match best {
        Some((mv, score)) => SearchResult::Best { mv, score },
        None => SearchResult::NoMoves,
    }
}

/// 時間内なら最善手、時間切れなら空きマスからランダムに選ぶ
pub fn select_move(board: &mut Board, mark: Mark, deadline: &Deadline) -> Option<Move> {
    let mut stats = SearchStats::default();
    select_move_with_stats(board, mark, deadline, &mut stats)
}

pub fn select_move_with_stats(
    board: &mut Board,
    mark: Mark,
    deadline: &Deadline,
    stats: &mut SearchStats,
) -> Option<Move> {
    match find_best_move(board, mark, deadline, stats) {
        SearchResult::Best { mv, .. } => Some(mv),
        SearchResult::NoMoves => None,
        SearchResult::TimedOut => {
            tracing::warn!(
                elapsed_ms = deadline.elapsed().as_millis() as u64,
                nodes = stats.nodes,
                "search budget exceeded, falling back to a random move"
            );
            random_move(&available_moves(board))
        }
    }
}

pub struct MinimaxAI {
    pub mark: Mark,
    pub name: String,
    /// false なら時間切れ時にランダム手を使わず投了扱い
    pub fallback_to_random: bool,
    last_stats: RefCell<SearchStats>,
}

impl MinimaxAI {
    pub fn new(mark: Mark, name: &str) -> Self {
        Self {
            mark,
            name: name.to_string(),
            fallback_to_random: true,
            last_stats: RefCell::new(SearchStats::default()),
        }
    }

    pub fn with_fallback(mut self, fallback_to_random: bool) -> Self {
        self.fallback_to_random = fallback_to_random;
        self
    }

    pub fn last_stats(&self) -> SearchStats {
        *self.last_stats.borrow()
    }
}

impl PlayerController for MinimaxAI {
    fn choose_move(
        &self,
        board: &mut Board,
        legal_moves: &[Move],
        deadline: &Deadline,
    ) -> Option<Move> {
        if legal_moves.is_empty() {
            return None;
        }

        let mut stats = SearchStats::default();
        let chosen = if self.fallback_to_random {
            select_move_with_stats(board, self.mark, deadline, &mut stats)
        } else {
            match find_best_move(board, self.mark, deadline, &mut stats) {
                SearchResult::Best { mv, .. } => Some(mv),
                SearchResult::TimedOut | SearchResult::NoMoves => None,
            }
        };

        tracing::debug!(
            player = %self.name,
            mark = %self.mark,
            nodes = stats.nodes,
            cutoffs = stats.cutoffs,
            max_depth = stats.max_depth,
            elapsed_us = deadline.elapsed().as_micros() as u64,
            chosen = ?chosen.map(Move::cell),
            "minimax turn finished"
        );
        *self.last_stats.borrow_mut() = stats;

        chosen
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_local(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::{LOSS_SCORE, WIN_SCORE};
    use std::time::Duration;

    fn full_window(board: &mut Board, maximizer: Mark, is_max: bool) -> SearchOutcome {
        let mut stats = SearchStats::default();
        search(
            board,
            maximizer,
            0,
            -SCORE_INF,
            SCORE_INF,
            is_max,
            &Deadline::unlimited(),
            &mut stats,
        )
    }

    #[test]
    fn completed_line_scores_without_descending() {
        let mut board = Board::from_rows(&["X X X", "O O .", ". . ."]).unwrap();
        let mut stats = SearchStats::default();
        let outcome = search(
            &mut board,
            Mark::X,
            0,
            -SCORE_INF,
            SCORE_INF,
            false,
            &Deadline::unlimited(),
            &mut stats,
        );
        assert_eq!(outcome, SearchOutcome::Score(WIN_SCORE));
        assert_eq!(stats.nodes, 1);
        assert_eq!(stats.max_depth, 0);
        assert_eq!(
            full_window(&mut board, Mark::O, true),
            SearchOutcome::Score(LOSS_SCORE)
        );
    }

    #[test]
    fn full_board_without_line_is_draw() {
        let mut board = Board::from_rows(&["X O X", "X O O", "O X X"]).unwrap();
        assert_eq!(
            full_window(&mut board, Mark::X, true),
            SearchOutcome::Score(DRAW_SCORE)
        );
    }

    #[test]
    fn takes_immediate_win() {
        // O to move: 8 completes the middle column, 7 only blocks
        let mut board = Board::from_rows(&["X O X", "X O .", ". . ."]).unwrap();
        let mut stats = SearchStats::default();
        let result = find_best_move(&mut board, Mark::O, &Deadline::unlimited(), &mut stats);
        assert_eq!(
            result,
            SearchResult::Best {
                mv: Move(8),
                score: WIN_SCORE
            }
        );
    }

    #[test]
    fn blocks_opponent_threat() {
        // X threatens 3 on the top row, O must block
        let mut board = Board::from_rows(&["X X .", ". O .", ". . ."]).unwrap();
        assert_eq!(
            select_move(&mut board, Mark::O, &Deadline::unlimited()),
            Some(Move(3))
        );
    }

    #[test]
    fn expired_deadline_times_out_and_restores_board() {
        let mut board = Board::from_rows(&["X . .", ". . .", ". . ."]).unwrap();
        let before = board.clone();
        let deadline = Deadline::starting_now(Duration::ZERO);
        let mut stats = SearchStats::default();
        assert_eq!(
            find_best_move(&mut board, Mark::O, &deadline, &mut stats),
            SearchResult::TimedOut
        );
        assert_eq!(board, before);
    }

    #[test]
    fn no_moves_on_full_board() {
        let mut board = Board::from_rows(&["X O", "O X"]).unwrap();
        assert_eq!(select_move(&mut board, Mark::X, &Deadline::unlimited()), None);
    }

    #[test]
    fn controller_records_stats() {
        let ai = MinimaxAI::new(Mark::O, "Computer");
        let mut board = Board::from_rows(&["X . .", ". . .", ". . ."]).unwrap();
        let legal = available_moves(&board);
        let mv = ai
            .choose_move(&mut board, &legal, &Deadline::unlimited())
            .unwrap();
        assert!(legal.contains(&mv));
        assert!(ai.last_stats().nodes > 0);
    }

    #[test]
    fn controller_without_fallback_resigns_on_timeout() {
        let ai = MinimaxAI::new(Mark::O, "Computer").with_fallback(false);
        let mut board = Board::new(3, 3).unwrap();
        board.apply(Move(1), Mark::X);
        let legal = available_moves(&board);
        let deadline = Deadline::starting_now(Duration::ZERO);
        assert_eq!(ai.choose_move(&mut board, &legal, &deadline), None);
    }
}
