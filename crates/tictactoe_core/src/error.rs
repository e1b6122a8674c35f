use thiserror::Error;

// Raised by `Board::result` when a move cannot be applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidAction {
    #[error("Invalid action: ({row}, {col}) is not a board position")]
    OutOfBounds { row: usize, col: usize },
    #[error("Invalid action: cell ({row}, {col}) is already occupied")]
    Occupied { row: usize, col: usize },
}
