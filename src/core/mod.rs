//! Value types the trial is built from.
//!
//! This module holds no randomness and no clocks:
//! - Shells, boards and board geometry
//! - Append-only board history with the derived trial predicates
//! - Trial phases and the operations they accept

mod history;
mod phase;
mod shell;

pub use history::History;
pub use phase::{Operation, TrialPhase};
pub use shell::{
    Board, BoardGeometry, Shell, DEFAULT_BOARD_HEIGHT, DEFAULT_BOARD_WIDTH, DEFAULT_SHELL_COUNT,
    DEFAULT_SHELL_SIZE,
};
