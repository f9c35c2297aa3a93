//! Random, non-overlapping shell placement.

use crate::core::{Board, BoardGeometry, Shell};
use rand::Rng;

/// Check whether two footprints of edge `size` collide.
///
/// Uses the closed test `|dx| <= size && |dy| <= size` on the top-left
/// corners, so shells exactly `size` apart still count as overlapping.
pub fn overlaps(a: &Shell, b: &Shell, size: u32) -> bool {
    a.x.abs_diff(b.x) <= size && a.y.abs_diff(b.y) <= size
}

/// Produces fresh layouts for an existing set of shells.
///
/// The geometry is expected to have passed [`config::check`]; the trial
/// state machine never starts a trial on one that has not.
///
/// [`config::check`]: crate::config::check
#[derive(Clone, Copy, Debug)]
pub struct PositionGenerator {
    geometry: BoardGeometry,
}

impl PositionGenerator {
    pub fn new(geometry: BoardGeometry) -> Self {
        Self { geometry }
    }

    pub fn geometry(&self) -> &BoardGeometry {
        &self.geometry
    }

    /// Re-place every shell of `board` at a random spot.
    ///
    /// Shells are placed in slot order, each resampled until it clears every
    /// shell already placed in this pass. Earlier shells are never moved
    /// again. There is no attempt cap; the geometry is assumed to leave
    /// room for all shells (three 100px shells on 700x500 settle in a few
    /// draws).
    ///
    /// # Panics
    ///
    /// Panics if the board is not wider and taller than one shell. Does not
    /// return if the board fails [`fits_every_shell`] and random placement
    /// runs out of free spots.
    ///
    /// [`fits_every_shell`]: crate::config::fits_every_shell
    pub fn generate<R: Rng + ?Sized>(&self, board: &Board, rng: &mut R) -> Board {
        let size = self.geometry.shell_size;
        let mut placed: Vec<Shell> = Vec::with_capacity(board.len());

        for shell in board.shells() {
            let mut candidate = self.random_spot(*shell, rng);
            while placed.iter().any(|other| overlaps(other, &candidate, size)) {
                candidate = self.random_spot(*shell, rng);
            }
            placed.push(candidate);
        }

        Board::new(placed)
    }

    fn random_spot<R: Rng + ?Sized>(&self, shell: Shell, rng: &mut R) -> Shell {
        let size = self.geometry.shell_size;
        let x = rng.gen_range(0..self.geometry.width - size);
        let y = rng.gen_range(0..self.geometry.height - size);
        shell.moved_to(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn overlap_boundary_is_closed() {
        let a = Shell::new(0, 0, false);

        assert!(overlaps(&a, &Shell::new(100, 100, false), 100));
        assert!(!overlaps(&a, &Shell::new(101, 0, false), 100));
        assert!(!overlaps(&a, &Shell::new(0, 101, false), 100));
    }

    #[test]
    fn overlap_is_symmetric() {
        let a = Shell::new(250, 40, false);
        let b = Shell::new(180, 120, false);

        assert_eq!(overlaps(&a, &b, 100), overlaps(&b, &a, 100));
    }

    #[test]
    fn generated_shells_stay_apart() {
        let geometry = BoardGeometry::default();
        let generator = PositionGenerator::new(geometry);
        let mut rng = StdRng::seed_from_u64(7);
        let mut board = geometry.initial_board().with_ball_at(1);

        for _ in 0..200 {
            board = generator.generate(&board, &mut rng);
            let shells = board.shells();
            for i in 0..shells.len() {
                for j in (i + 1)..shells.len() {
                    assert!(!overlaps(&shells[i], &shells[j], geometry.shell_size));
                }
            }
        }
    }

    #[test]
    fn generated_shells_stay_in_bounds() {
        let geometry = BoardGeometry::default();
        let generator = PositionGenerator::new(geometry);
        let mut rng = StdRng::seed_from_u64(11);
        let board = geometry.initial_board();

        for _ in 0..200 {
            for shell in generator.generate(&board, &mut rng).shells() {
                assert!(shell.x < geometry.width - geometry.shell_size);
                assert!(shell.y < geometry.height - geometry.shell_size);
            }
        }
    }

    #[test]
    #[should_panic]
    fn board_narrower_than_a_shell_panics() {
        let geometry = BoardGeometry {
            width: 80,
            ..BoardGeometry::default()
        };
        let generator = PositionGenerator::new(geometry);
        let mut rng = StdRng::seed_from_u64(1);

        generator.generate(&geometry.initial_board(), &mut rng);
    }

    #[test]
    fn generate_keeps_ball_with_its_slot() {
        let geometry = BoardGeometry::default();
        let generator = PositionGenerator::new(geometry);
        let mut rng = StdRng::seed_from_u64(3);
        let board = geometry.initial_board().with_ball_at(2);

        let moved = generator.generate(&board, &mut rng);

        assert_eq!(moved.len(), board.len());
        assert_eq!(moved.ball_index(), Some(2));
    }
}
