use std::fmt;
use crate::{Action, Cell, InvalidAction, Player};

pub const BOARD_SIZE: usize = 3;

// Every line that wins the game: 3 rows, 3 columns, 2 diagonals
const LINES: [[(usize, usize); 3]; 8] = [
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Winner(Player),
    Draw,
    InProgress,
}

// The board is a plain value: moves return a fresh copy and never touch `self`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board {
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    // Build an arbitrary position. No reachability check is made.
    pub fn from_rows(cells: [[Cell; BOARD_SIZE]; BOARD_SIZE]) -> Self {
        Self { cells }
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    pub fn rows(&self) -> &[[Cell; BOARD_SIZE]; BOARD_SIZE] {
        &self.cells
    }

    // All cells with their coordinates, row-major
    pub fn cells(&self) -> impl Iterator<Item = (Action, Cell)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(move |(col, &cell)| (Action::new(row, col), cell))
        })
    }

    pub fn player(&self) -> Player {
        let mut x_count = 0;
        let mut o_count = 0;

        for row in &self.cells {
            for cell in row {
                match cell {
                    Cell::MarkX => x_count += 1,
                    Cell::MarkO => o_count += 1,
                    Cell::Empty => {}
                }
            }
        }

        // X always opens, so an extra X means O is to move
        if x_count > o_count {
            Player::O
        } else {
            Player::X
        }
    }

    pub fn actions(&self) -> Vec<Action> {
        self.cells()
            .filter(|(_, cell)| cell.is_empty())
            .map(|(action, _)| action)
            .collect()
    }

    pub fn result(&self, action: Action) -> Result<Board, InvalidAction> {
        let Action { row, col } = action;

        if !action.is_on_board() {
            log::trace!("rejecting off-board action {}", action);
            return Err(InvalidAction::OutOfBounds { row, col });
        }

        if !self.cells[row][col].is_empty() {
            log::trace!("rejecting action {} on occupied cell", action);
            return Err(InvalidAction::Occupied { row, col });
        }

        // The mover comes from the board we were given, not from the caller
        let mut next = *self;
        next.cells[row][col] = self.player().mark();
        Ok(next)
    }

    pub fn winner(&self) -> Option<Player> {
        // X is checked first; only matters for boards no legal game reaches
        [Player::X, Player::O].into_iter().find(|&player| {
            let mark = player.mark();
            LINES
                .iter()
                .any(|line| line.iter().all(|&(row, col)| self.cells[row][col] == mark))
        })
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().flatten().all(|cell| !cell.is_empty())
    }

    pub fn terminal(&self) -> bool {
        self.winner().is_some() || self.is_full()
    }

    // Only meaningful on terminal boards; anything else scores 0
    pub fn utility(&self) -> i32 {
        match self.winner() {
            Some(Player::X) => 1,
            Some(Player::O) => -1,
            None => 0,
        }
    }

    pub fn outcome(&self) -> Outcome {
        match self.winner() {
            Some(player) => Outcome::Winner(player),
            None if self.is_full() => Outcome::Draw,
            None => Outcome::InProgress,
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            for cell in row {
                write!(f, "{}", cell)?;
            }
        }
        Ok(())
    }
}
