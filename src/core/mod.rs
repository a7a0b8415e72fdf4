pub mod board;
pub mod clock;
pub mod r#move;
pub mod types;

pub use board::{Board, BoardError, MAX_BOARD_SIZE, MIN_BOARD_SIZE};
pub use clock::Deadline;
pub use r#move::Move;
pub use types::{Mark, Position};
