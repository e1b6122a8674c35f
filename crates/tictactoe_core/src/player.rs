use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    X,
    O,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    // The cell value this player leaves behind when it moves
    pub fn mark(self) -> Cell {
        match self {
            Player::X => Cell::MarkX,
            Player::O => Cell::MarkO,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::X => f.write_str("X"),
            Player::O => f.write_str("O"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    MarkX,
    MarkO,
}

impl Cell {
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    // Which player owns this cell, if anyone
    pub fn owner(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::MarkX => Some(Player::X),
            Cell::MarkO => Some(Player::O),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => f.write_str("."),
            Cell::MarkX => f.write_str("X"),
            Cell::MarkO => f.write_str("O"),
        }
    }
}
