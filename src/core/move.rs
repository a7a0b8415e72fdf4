use super::types::Position;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 1 始まりのセル番号。行優先で (row, col) = ((i-1)/cols, (i-1)%cols)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Move(pub usize);

impl Move {
    pub fn new(cell: usize) -> Self {
        Move(cell)
    }

    pub fn cell(self) -> usize {
        self.0
    }

    /// `cols` 列の盤面上の座標。セル番号 0 は呼び出し側の不具合
    pub fn position(self, cols: usize) -> Position {
        debug_assert!(self.0 >= 1, "cell numbers are 1-based");
        let index = self.0 - 1;
        Position::new(index / cols, index % cols)
    }

    pub fn from_position(pos: Position, cols: usize) -> Self {
        Move(pos.row * cols + pos.col + 1)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_maps_to_row_major_position() {
        assert_eq!(Move(1).position(3), Position::new(0, 0));
        assert_eq!(Move(3).position(3), Position::new(0, 2));
        assert_eq!(Move(4).position(3), Position::new(1, 0));
        assert_eq!(Move(9).position(3), Position::new(2, 2));
        // 長方形の盤面
        assert_eq!(Move(7).position(4), Position::new(1, 2));
        assert_eq!(Move::from_position(Position::new(1, 2), 4), Move(7));
    }
}
