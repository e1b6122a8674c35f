pub mod search;
pub mod ai;

pub use search::{max_value, min_value, minimax, minimax_parallel, search, SearchReport, SearchStats};
pub use ai::TicTacToeAI;
