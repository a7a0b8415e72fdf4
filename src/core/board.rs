use super::r#move::Move;
use super::types::{Mark, Position};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_BOARD_SIZE: usize = 2;
pub const MAX_BOARD_SIZE: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("board must be between 2x2 and 100x100, got {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },
    #[error("cell {cell} is outside the board (1..={max})")]
    OutOfRange { cell: usize, max: usize },
    #[error("cell {0} is already occupied")]
    Occupied(usize),
    #[error("cannot parse board: {0}")]
    Parse(String),
}

/// 盤面
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub rows: usize,
    pub cols: usize,
    /// 行優先のセル
    cells: Vec<Option<Mark>>,
}

impl Board {
    pub fn new(rows: usize, cols: usize) -> Result<Self, BoardError> {
        let valid = MIN_BOARD_SIZE..=MAX_BOARD_SIZE;
        if !valid.contains(&rows) || !valid.contains(&cols) {
            return Err(BoardError::InvalidDimensions { rows, cols });
        }
        Ok(Board {
            rows,
            cols,
            cells: vec![None; rows * cols],
        })
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    pub fn get(&self, pos: Position) -> Option<Mark> {
        self.cells[pos.row * self.cols + pos.col]
    }

    pub fn get_cell(&self, mv: Move) -> Option<Mark> {
        self.cells[mv.cell() - 1]
    }

    pub fn is_empty_cell(&self, mv: Move) -> bool {
        self.get_cell(mv).is_none()
    }

    /// 探索用の着手。空きマスであることは呼び出し側が保証する
    pub fn apply(&mut self, mv: Move, mark: Mark) {
        debug_assert!(self.is_empty_cell(mv), "apply on occupied cell {}", mv);
        self.cells[mv.cell() - 1] = Some(mark);
    }

    /// `apply` の取り消し
    pub fn undo(&mut self, mv: Move) {
        debug_assert!(!self.is_empty_cell(mv), "undo on empty cell {}", mv);
        self.cells[mv.cell() - 1] = None;
    }

    /// 手番処理からの着手 (範囲と空きをチェックする)
    pub fn place(&mut self, mv: Move, mark: Mark) -> Result<(), BoardError> {
        let max = self.cell_count();
        if mv.cell() < 1 || mv.cell() > max {
            return Err(BoardError::OutOfRange {
                cell: mv.cell(),
                max,
            });
        }
        if !self.is_empty_cell(mv) {
            return Err(BoardError::Occupied(mv.cell()));
        }
        self.cells[mv.cell() - 1] = Some(mark);
        Ok(())
    }

    pub fn reset(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = None);
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    pub fn count(&self, mark: Mark) -> usize {
        self.cells.iter().filter(|c| **c == Some(mark)).count()
    }

    /// 次に打つ記号 (X が先手)
    pub fn next_mark(&self) -> Mark {
        if self.count(Mark::X) == self.count(Mark::O) {
            Mark::X
        } else {
            Mark::O
        }
    }

    /// 交互に打った盤面なら X の数 - O の数 は 0 か 1
    pub fn is_well_formed(&self) -> bool {
        let x = self.count(Mark::X);
        let o = self.count(Mark::O);
        x == o || x == o + 1
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// 文字列配列から盤面を作る。`X` / `O` が記号、`.` / `_` が空きマス
    pub fn from_rows(rows: &[&str]) -> Result<Self, BoardError> {
        let height = rows.len();
        let width = rows
            .first()
            .map(|r| r.split_whitespace().count())
            .unwrap_or(0);
        let mut board = Board::new(height, width)?;

        for (row, line) in rows.iter().enumerate() {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() != width {
                return Err(BoardError::Parse(format!(
                    "row {} has {} cells, expected {}",
                    row + 1,
                    tokens.len(),
                    width
                )));
            }
            for (col, token) in tokens.into_iter().enumerate() {
                let mark = match token {
                    "X" | "x" => Some(Mark::X),
                    "O" | "o" => Some(Mark::O),
                    "." | "_" => None,
                    other => {
                        return Err(BoardError::Parse(format!("unknown cell '{}'", other)));
                    }
                };
                if let Some(m) = mark {
                    board.apply(Move::from_position(Position::new(row, col), width), m);
                }
            }
        }
        Ok(board)
    }
}
