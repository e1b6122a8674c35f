// Core tic-tac-toe game logic modules
pub mod action;
pub mod board;
pub mod error;
pub mod player;

// Re-export main types for convenience
pub use action::Action;
pub use board::{Board, Outcome, BOARD_SIZE};
pub use error::InvalidAction;
pub use player::{Cell, Player};

// Free-function interface used by the search and by presentation layers.
// Each one is a thin wrapper over the matching `Board` method.

pub fn initial_state() -> Board {
    Board::new()
}

pub fn player(board: &Board) -> Player {
    board.player()
}

pub fn actions(board: &Board) -> Vec<Action> {
    board.actions()
}

pub fn result(board: &Board, action: Action) -> Result<Board, InvalidAction> {
    board.result(action)
}

pub fn winner(board: &Board) -> Option<Player> {
    board.winner()
}

pub fn terminal(board: &Board) -> bool {
    board.terminal()
}

pub fn utility(board: &Board) -> i32 {
    board.utility()
}

pub fn outcome(board: &Board) -> Outcome {
    board.outcome()
}
