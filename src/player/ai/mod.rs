pub mod config;
pub mod minimax;
pub mod random;

pub use config::AIConfig;
pub use minimax::{find_best_move, search, select_move, MinimaxAI, SearchOutcome, SearchResult};
pub use random::{random_move, RandomAI};
