//! Decides the next layout of a running trial.
//!
//! Every shuffle but the last is a fresh random layout. The last one only
//! swaps the starting board's x-coordinates between shells, so the final
//! layout keeps the start's y-coordinates.

use crate::config::TrialConfig;
use crate::core::{Board, History};
use crate::position::PositionGenerator;
use rand::Rng;
use tracing::debug;

/// Produces the next board of a trial from its history.
#[derive(Clone, Copy, Debug)]
pub struct ShuffleEngine {
    generator: PositionGenerator,
}

impl ShuffleEngine {
    pub fn new(generator: PositionGenerator) -> Self {
        Self { generator }
    }

    pub fn generator(&self) -> &PositionGenerator {
        &self.generator
    }

    /// Next board for `history`, or `None` once `move_limit` shuffles are done.
    pub fn next_board<R: Rng + ?Sized>(
        &self,
        history: &History,
        config: &TrialConfig,
        rng: &mut R,
    ) -> Option<Board> {
        let moves_done = history.moves_done();
        if moves_done >= config.move_limit {
            return None;
        }

        let is_final_move = moves_done + 1 == config.move_limit;
        debug!(moves_done, is_final_move, "shuffling shells");

        let board = if is_final_move {
            final_shuffle(history.first(), rng)
        } else {
            self.generator.generate(history.latest(), rng)
        };
        Some(board)
    }

    /// Record the next board, returning the extended history.
    ///
    /// Returns `None` (and leaves `history` as is) when the trial already
    /// has all of its moves.
    pub fn shuffle<R: Rng + ?Sized>(
        &self,
        history: &History,
        config: &TrialConfig,
        rng: &mut R,
    ) -> Option<History> {
        self.next_board(history, config, rng)
            .map(|board| history.record(board))
    }
}

/// Deal `original`'s x-coordinates back out to its shells in random order.
///
/// Each shell draws one of the remaining x values without replacement;
/// y-coordinates and the ball stay where `original` has them.
pub fn final_shuffle<R: Rng + ?Sized>(original: &Board, rng: &mut R) -> Board {
    let mut available: Vec<u32> = original.shells().iter().map(|shell| shell.x).collect();

    let shells = original
        .shells()
        .iter()
        .map(|shell| {
            let x = available.remove(rng.gen_range(0..available.len()));
            shell.moved_to(x, shell.y)
        })
        .collect();

    Board::new(shells)
}
