use crate::core::{Board, Mark, Move, Position};

pub const WIN_SCORE: i32 = 10;
pub const LOSS_SCORE: i32 = -10;
pub const DRAW_SCORE: i32 = 0;

/// 対局の終了状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Win(Mark),
    Draw,
}

/// 空きマス一覧 (行優先、1 始まり)
pub fn available_moves(board: &Board) -> Vec<Move> {
    let mut moves = Vec::new();
    for row in 0..board.rows {
        for col in 0..board.cols {
            let pos = Position::new(row, col);
            if board.get(pos).is_none() {
                moves.push(Move::from_position(pos, board.cols));
            }
        }
    }
    moves
}

fn has_row(board: &Board, mark: Mark) -> bool {
    (0..board.rows).any(|row| {
        (0..board.cols).all(|col| board.get(Position::new(row, col)) == Some(mark))
    })
}

fn has_col(board: &Board, mark: Mark) -> bool {
    (0..board.cols).any(|col| {
        (0..board.rows).all(|row| board.get(Position::new(row, col)) == Some(mark))
    })
}

/// 対角線は正方形の盤面でのみ成立する
fn has_diagonal(board: &Board, mark: Mark) -> bool {
    if !board.is_square() {
        return false;
    }
    let n = board.rows;
    let main = (0..n).all(|i| board.get(Position::new(i, i)) == Some(mark));
    let anti = (0..n).all(|i| board.get(Position::new(i, n - i - 1)) == Some(mark));
    main || anti
}

/// 行・列・対角線のいずれかが `mark` で埋まっているか
pub fn has_line(board: &Board, mark: Mark) -> bool {
    has_row(board, mark) || has_col(board, mark) || has_diagonal(board, mark)
}

/// `maximizer` から見た評価値。勝ち判定は maximizer を先に確認する
pub fn evaluate(board: &Board, maximizer: Mark) -> i32 {
    if has_line(board, maximizer) {
        return WIN_SCORE;
    }
    if has_line(board, maximizer.opponent()) {
        return LOSS_SCORE;
    }
    DRAW_SCORE
}

pub fn winner(board: &Board) -> Option<Mark> {
    [Mark::X, Mark::O].into_iter().find(|&mark| has_line(board, mark))
}

/// 終局していれば結果を返す
pub fn outcome(board: &Board) -> Option<GameOutcome> {
    if let Some(mark) = winner(board) {
        Some(GameOutcome::Win(mark))
    } else if board.is_full() {
        Some(GameOutcome::Draw)
    } else {
        None
    }
}
