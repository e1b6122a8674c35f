// Exhaustive minimax over the full game tree. No pruning and no caching:
// the tree below the empty board is small enough to walk every time.
use std::time::{Duration, Instant};
use tictactoe_core::{Action, Board, Player};
use rayon::prelude::*;

// Seeds for the running best; every utility lies strictly between them
const NEG_INFINITY: i32 = i32::MIN;
const POS_INFINITY: i32 = i32::MAX;

// Counters collected while walking the tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,  // positions evaluated below the root
    pub leaves: u64, // terminal positions reached
}

impl SearchStats {
    fn merge(&mut self, other: SearchStats) {
        self.nodes += other.nodes;
        self.leaves += other.leaves;
    }
}

// What a root search found, for callers that want more than the move
#[derive(Debug, Clone)]
pub struct SearchReport {
    pub best_action: Option<Action>,
    pub value: Option<i32>,
    pub candidates: Vec<(Action, i32)>, // every root action with its value, row-major
    pub stats: SearchStats,
    pub elapsed: Duration,
}

// Returns the optimal action for the player to move, or None once the game is over
pub fn minimax(board: &Board) -> Option<Action> {
    search(board, false).best_action
}

// Same answer as `minimax`, with the root actions searched on the rayon pool
pub fn minimax_parallel(board: &Board) -> Option<Action> {
    search(board, true).best_action
}

pub fn max_value(board: &Board) -> i32 {
    max_value_counted(board, &mut SearchStats::default())
}

pub fn min_value(board: &Board) -> i32 {
    min_value_counted(board, &mut SearchStats::default())
}

// Main entry point: scores every root action and picks the best for the mover
pub fn search(board: &Board, parallel: bool) -> SearchReport {
    let start_time = Instant::now();

    if board.terminal() {
        log::debug!("board {} is terminal, nothing to search", board);
        return SearchReport {
            best_action: None,
            value: None,
            candidates: Vec::new(),
            stats: SearchStats::default(),
            elapsed: start_time.elapsed(),
        };
    }

    let mover = board.player();
    let children = children(board);

    // Score each child from the opponent's side of the tree
    let scored: Vec<(Action, i32, SearchStats)> = if parallel {
        children
            .into_par_iter()
            .map(|(action, child)| score_child(mover, action, &child))
            .collect()
    } else {
        children
            .into_iter()
            .map(|(action, child)| score_child(mover, action, &child))
            .collect()
    };

    // Selection always runs in row-major order, so both modes agree on ties
    let mut stats = SearchStats::default();
    let mut best_action = None;
    let mut best_value = match mover {
        Player::X => NEG_INFINITY,
        Player::O => POS_INFINITY,
    };
    let mut candidates = Vec::with_capacity(scored.len());

    for (action, value, child_stats) in scored {
        stats.merge(child_stats);
        log::debug!("candidate {} for {}: value {}", action, mover, value);

        let improves = match mover {
            Player::X => value > best_value,
            Player::O => value < best_value,
        };
        if improves {
            best_value = value;
            best_action = Some(action);
        }
        candidates.push((action, value));
    }

    let elapsed = start_time.elapsed();
    if let Some(action) = best_action {
        log::info!(
            "{} plays {} (value {}) after {} nodes, {} leaves in {:?}",
            mover,
            action,
            best_value,
            stats.nodes,
            stats.leaves,
            elapsed
        );
    }

    SearchReport {
        best_action,
        value: best_action.map(|_| best_value),
        candidates,
        stats,
        elapsed,
    }
}

fn score_child(mover: Player, action: Action, child: &Board) -> (Action, i32, SearchStats) {
    let mut stats = SearchStats::default();
    let value = match mover {
        Player::X => min_value_counted(child, &mut stats),
        Player::O => max_value_counted(child, &mut stats),
    };
    (action, value, stats)
}

// Every legal action paired with the board it produces
fn children(board: &Board) -> Vec<(Action, Board)> {
    board
        .actions()
        .into_iter()
        .filter_map(|action| match board.result(action) {
            Ok(child) => Some((action, child)),
            Err(err) => {
                // actions() only yields empty cells, so this means a broken board
                log::warn!("skipping generated action on {}: {}", board, err);
                None
            }
        })
        .collect()
}

fn max_value_counted(board: &Board, stats: &mut SearchStats) -> i32 {
    stats.nodes += 1;
    if board.terminal() {
        stats.leaves += 1;
        return board.utility();
    }

    let mut value = NEG_INFINITY;
    for (_, child) in children(board) {
        value = value.max(min_value_counted(&child, stats));
    }
    value
}

fn min_value_counted(board: &Board, stats: &mut SearchStats) -> i32 {
    stats.nodes += 1;
    if board.terminal() {
        stats.leaves += 1;
        return board.utility();
    }

    let mut value = POS_INFINITY;
    for (_, child) in children(board) {
        value = value.min(max_value_counted(&child, stats));
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tictactoe_core::{Cell, Outcome};

    const E: Cell = Cell::Empty;
    const X: Cell = Cell::MarkX;
    const O: Cell = Cell::MarkO;

    fn value(board: &Board) -> i32 {
        match board.player() {
            Player::X => max_value(board),
            Player::O => min_value(board),
        }
    }

    // Every distinct board reachable within `plies` moves of the start
    fn reachable(plies: usize) -> Vec<Board> {
        let mut seen = HashSet::new();
        let mut frontier = vec![Board::new()];
        let mut all = vec![Board::new()];
        seen.insert(Board::new());

        for _ in 0..plies {
            let mut next = Vec::new();
            for board in &frontier {
                if board.terminal() {
                    continue;
                }
                for action in board.actions() {
                    let child = board.result(action).unwrap();
                    if seen.insert(child) {
                        next.push(child);
                        all.push(child);
                    }
                }
            }
            frontier = next;
        }
        all
    }

    #[test]
    fn terminal_board_has_no_move() {
        let won = Board::from_rows([[X, X, X], [O, O, E], [E, E, E]]);
        let drawn = Board::from_rows([[X, O, X], [X, O, O], [O, X, X]]);
        assert_eq!(minimax(&won), None);
        assert_eq!(minimax(&drawn), None);
        assert_eq!(minimax_parallel(&drawn), None);
    }

    #[test]
    fn empty_board_is_a_draw() {
        assert_eq!(max_value(&Board::new()), 0);
    }

    #[test]
    fn first_move_is_earliest_optimal() {
        // Every opening draws, so the first row-major action wins the tie
        assert_eq!(minimax(&Board::new()), Some(Action::new(0, 0)));
    }

    #[test]
    fn full_tree_counts() {
        let report = search(&Board::new(), false);
        assert_eq!(report.stats.nodes, 549_945);
        assert_eq!(report.stats.leaves, 255_168);
        assert_eq!(report.candidates.len(), 9);
        assert!(report.candidates.iter().all(|&(_, v)| v == 0));
        assert_eq!(report.value, Some(0));
    }

    #[test]
    fn parallel_stats_match_sequential() {
        let board = Board::new().result(Action::new(1, 1)).unwrap();
        let sequential = search(&board, false);
        let parallel = search(&board, true);
        assert_eq!(sequential.stats, parallel.stats);
        assert_eq!(sequential.candidates, parallel.candidates);
    }

    #[test]
    fn x_takes_immediate_win() {
        // X to move, (0,2) completes the top row
        let board = Board::from_rows([[X, X, E], [O, O, E], [E, E, E]]);
        assert_eq!(board.player(), Player::X);
        assert_eq!(minimax(&board), Some(Action::new(0, 2)));
    }

    #[test]
    fn o_takes_immediate_win() {
        let board = Board::from_rows([[X, X, E], [O, O, E], [X, E, E]]);
        assert_eq!(board.player(), Player::O);
        assert_eq!(minimax(&board), Some(Action::new(1, 2)));
    }

    #[test]
    fn o_blocks_threat() {
        let board = Board::from_rows([[X, X, E], [E, O, E], [E, E, E]]);
        assert_eq!(board.player(), Player::O);
        assert_eq!(minimax(&board), Some(Action::new(0, 2)));
    }

    #[test]
    fn x_finds_forced_win() {
        // Fork available: X at (2,2) threatens both (2,0)..(2,2) and the diagonal
        let board = Board::from_rows([[X, O, E], [E, E, E], [E, E, E]]);
        let best = minimax(&board).unwrap();
        let after = board.result(best).unwrap();
        assert_eq!(min_value(&after), 1);
    }

    #[test]
    fn optimal_self_play_draws() {
        let mut board = Board::new();
        while let Some(action) = minimax(&board) {
            board = board.result(action).unwrap();
        }
        assert!(board.terminal());
        assert_eq!(board.utility(), 0);
        assert_eq!(board.outcome(), Outcome::Draw);
    }

    #[test]
    fn x_never_loses_against_any_o() {
        // X follows minimax; O tries every reply at every turn
        fn explore(board: Board) {
            if board.terminal() {
                assert_ne!(board.winner(), Some(Player::O), "X lost on {}", board);
                return;
            }
            match board.player() {
                Player::X => {
                    let action = minimax(&board).unwrap();
                    explore(board.result(action).unwrap());
                }
                Player::O => {
                    for action in board.actions() {
                        explore(board.result(action).unwrap());
                    }
                }
            }
        }
        explore(Board::new().result(minimax(&Board::new()).unwrap()).unwrap());
    }

    #[test]
    fn chosen_move_preserves_value() {
        for board in reachable(9) {
            if board.terminal() || board.actions().len() > 7 {
                continue;
            }
            let action = minimax(&board).unwrap();
            let child = board.result(action).unwrap();
            assert_eq!(value(&child), value(&board), "board {}", board);
        }
    }

    #[test]
    fn parallel_agrees_with_sequential() {
        for board in reachable(3) {
            assert_eq!(minimax(&board), minimax_parallel(&board), "board {}", board);
        }
    }

    #[test]
    fn search_leaves_board_untouched() {
        let board = Board::from_rows([[X, E, E], [E, O, E], [E, E, E]]);
        let snapshot = board;
        let _ = minimax(&board);
        assert_eq!(board, snapshot);
    }
}
