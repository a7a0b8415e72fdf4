use crate::core::{Board, Deadline, Move};

/// プレイヤー操作のtrait
pub trait PlayerController {
    /// `None` は投了。盤面は探索中に一時的に変更してよいが、戻してから返すこと
    fn choose_move(&self, board: &mut Board, legal_moves: &[Move], deadline: &Deadline)
        -> Option<Move>;
    fn name(&self) -> &str;
    fn is_local(&self) -> bool;
}
