use tictactoe_core::{Action, Board};
use crate::search::{search, SearchReport};

// Computer opponent handed to presentation layers. Always plays a perfect
// move; the only knob is whether the root is searched in parallel.
#[derive(Debug, Clone, Copy)]
pub struct TicTacToeAI {
    parallel: bool,
}

impl TicTacToeAI {
    pub fn new(parallel: bool) -> Self {
        TicTacToeAI { parallel }
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    pub fn set_parallel(&mut self, parallel: bool) {
        self.parallel = parallel;
    }

    pub fn analyze(&self, board: &Board) -> SearchReport {
        search(board, self.parallel)
    }

    pub fn get_move(&self, board: &Board) -> Option<Action> {
        let report = self.analyze(board);
        let action = report.best_action?;

        // Try the move on the board before handing it out
        match board.result(action) {
            Ok(_) => Some(action),
            Err(err) => {
                log::warn!("search produced an unplayable move on {}: {}", board, err);
                None
            }
        }
    }
}

impl Default for TicTacToeAI {
    fn default() -> Self {
        TicTacToeAI { parallel: true }
    }
}
