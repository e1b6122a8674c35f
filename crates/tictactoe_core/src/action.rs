use crate::board::BOARD_SIZE;
use std::fmt;

// A move on the board. Coordinates are not checked here: an action is only
// valid relative to a particular board, which `Board::result` decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Action {
    pub row: usize,
    pub col: usize,
}

impl Action {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn is_on_board(&self) -> bool {
        self.row < BOARD_SIZE && self.col < BOARD_SIZE
    }

    // Row-major index 0..9, None when off the board
    pub fn index(&self) -> Option<usize> {
        if self.is_on_board() {
            Some(self.row * BOARD_SIZE + self.col)
        } else {
            None
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        if index < BOARD_SIZE * BOARD_SIZE {
            Some(Self {
                row: index / BOARD_SIZE,
                col: index % BOARD_SIZE,
            })
        } else {
            None
        }
    }
}

impl From<(usize, usize)> for Action {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
