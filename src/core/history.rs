//! Board history for a single trial.
//!
//! The first board is the layout the trial started from; each later board
//! is one completed shuffle. Recording never touches earlier entries.

use super::shell::Board;
use serde::Serialize;

/// Ordered, append-only sequence of boards for the current trial.
///
/// History is immutable - `record` returns a new history with the board
/// added. It always holds at least the starting board.
///
/// # Example
///
/// ```rust
/// use shell_game::core::{BoardGeometry, History};
///
/// let start = BoardGeometry::default().initial_board().with_ball_at(0);
/// let history = History::starting_at(start.clone());
/// assert_eq!(history.moves_done(), 0);
///
/// let history = history.record(start);
/// assert_eq!(history.moves_done(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct History {
    boards: Vec<Board>,
}

impl History {
    /// History containing only the starting layout.
    pub fn starting_at(start: Board) -> Self {
        Self {
            boards: vec![start],
        }
    }

    /// Record a board, returning a new history.
    ///
    /// The existing history is left as it was.
    pub fn record(&self, board: Board) -> Self {
        let mut boards = self.boards.clone();
        boards.push(board);
        Self { boards }
    }

    /// Number of shuffles completed so far.
    pub fn moves_done(&self) -> u32 {
        (self.boards.len() - 1) as u32
    }

    /// The board the trial started from.
    pub fn first(&self) -> &Board {
        &self.boards[0]
    }

    /// The board currently on screen.
    pub fn latest(&self) -> &Board {
        &self.boards[self.boards.len() - 1]
    }

    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    pub fn len(&self) -> usize {
        self.boards.len()
    }

    /// Always `false`; kept for symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }

    /// Whether a winning shell was assigned at the start.
    pub fn is_started(&self) -> bool {
        self.first().has_ball()
    }

    /// The ball is only drawn at the start position, before any shuffle.
    pub fn is_ball_visible(&self) -> bool {
        self.boards.len() == 1 && self.is_started()
    }
}
