//! Shells, boards and the geometry they are laid out in.

use serde::{Deserialize, Serialize};

/// Default board width in pixels.
pub const DEFAULT_BOARD_WIDTH: u32 = 700;
/// Default board height in pixels.
pub const DEFAULT_BOARD_HEIGHT: u32 = 500;
/// Default edge length of a shell's square footprint.
pub const DEFAULT_SHELL_SIZE: u32 = 100;
/// Number of shells in the classic game.
pub const DEFAULT_SHELL_COUNT: usize = 3;

/// One physical shell at a position on the board.
///
/// Shells are plain values. A layout change produces new `Shell`s; identity
/// is the shell's index inside its [`Board`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shell {
    /// Horizontal offset of the footprint's top-left corner
    pub x: u32,
    /// Vertical offset of the footprint's top-left corner
    pub y: u32,
    /// Whether the ball is hidden under this shell
    pub has_ball: bool,
}

impl Shell {
    pub fn new(x: u32, y: u32, has_ball: bool) -> Self {
        Self { x, y, has_ball }
    }

    /// Same shell moved to `(x, y)`.
    pub fn moved_to(self, x: u32, y: u32) -> Self {
        Self { x, y, ..self }
    }
}

/// Immutable snapshot of every shell's position.
///
/// Index `i` is always "shell slot `i`", regardless of where the shell sits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    shells: Vec<Shell>,
}

impl Board {
    pub fn new(shells: Vec<Shell>) -> Self {
        Self { shells }
    }

    /// Shells in slot order.
    pub fn shells(&self) -> &[Shell] {
        &self.shells
    }

    pub fn len(&self) -> usize {
        self.shells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shells.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Shell> {
        self.shells.get(index)
    }

    /// Slot holding the ball, if the ball has been placed.
    pub fn ball_index(&self) -> Option<usize> {
        self.shells.iter().position(|shell| shell.has_ball)
    }

    /// Whether any shell hides the ball.
    pub fn has_ball(&self) -> bool {
        self.ball_index().is_some()
    }

    /// Copy of this board with the ball under `winner` and nowhere else.
    pub fn with_ball_at(&self, winner: usize) -> Self {
        let shells = self
            .shells
            .iter()
            .enumerate()
            .map(|(index, shell)| Shell {
                has_ball: index == winner,
                ..*shell
            })
            .collect();
        Self { shells }
    }
}

/// Bounds of the playing area and the shells placed on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardGeometry {
    pub width: u32,
    pub height: u32,
    /// Edge length of each shell's square footprint
    pub shell_size: u32,
    pub shell_count: usize,
}

impl Default for BoardGeometry {
    fn default() -> Self {
        Self {
            width: DEFAULT_BOARD_WIDTH,
            height: DEFAULT_BOARD_HEIGHT,
            shell_size: DEFAULT_SHELL_SIZE,
            shell_count: DEFAULT_SHELL_COUNT,
        }
    }
}

impl BoardGeometry {
    /// Layout shown before the first trial: one row, no ball.
    ///
    /// With the default geometry this is `(150,100) (300,100) (450,100)`.
    pub fn initial_board(&self) -> Board {
        let spacing = self.shell_size + self.shell_size / 2;
        let shells = (0..self.shell_count)
            .map(|slot| {
                let x = spacing.saturating_mul(slot as u32 + 1);
                Shell::new(x, self.shell_size, false)
            })
            .collect();
        Board::new(shells)
    }
}
