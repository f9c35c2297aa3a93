//! Trial state machine.
//!
//! Owns the board history, the locked configuration and the participant's
//! pick for the current trial. All randomness and time enter through
//! arguments, so the machine itself is deterministic.

use crate::config::{self, ConfigurationError, TrialConfig};
use crate::core::{Board, BoardGeometry, History, Operation, Shell, TrialPhase};
use crate::position::PositionGenerator;
use crate::settle::{LayoutId, SettleBarrier, SettleOutcome};
use crate::shuffle::ShuffleEngine;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

/// Errors for operations attempted at the wrong time.
///
/// These only come from stale or repeated UI events. Callers drop them;
/// the machine's state is unchanged whenever one is returned.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("`{operation}` is not permitted while the trial is {phase}")]
    NotPermitted {
        operation: Operation,
        phase: TrialPhase,
    },

    #[error("shell {index} does not exist (board has {count})")]
    ShellOutOfRange { index: usize, count: usize },
}

/// The participant's pick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// Slot of the picked shell
    pub index: usize,
    /// The picked shell as it was on screen
    pub shell: Shell,
    pub selected_at: DateTime<Utc>,
}

impl Selection {
    pub fn is_correct(&self) -> bool {
        self.shell.has_ball
    }
}

/// Everything needed to log a finished trial.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompletedTrial {
    pub trial: Uuid,
    pub config: TrialConfig,
    pub selection: Selection,
    pub started_at: DateTime<Utc>,
}

impl CompletedTrial {
    pub fn is_correct(&self) -> bool {
        self.selection.is_correct()
    }

    pub fn finished_at(&self) -> DateTime<Utc> {
        self.selection.selected_at
    }
}

/// State of the current trial.
#[derive(Clone, Debug)]
pub struct TrialStateMachine {
    engine: ShuffleEngine,
    history: History,
    config: TrialConfig,
    selection: Option<Selection>,
    started_at: Option<DateTime<Utc>>,
    barrier: SettleBarrier,
}

impl TrialStateMachine {
    /// Machine showing the geometry's initial layout, no trial started.
    pub fn new(geometry: BoardGeometry) -> Self {
        Self {
            engine: ShuffleEngine::new(PositionGenerator::new(geometry)),
            history: History::starting_at(geometry.initial_board()),
            config: TrialConfig::default(),
            selection: None,
            started_at: None,
            barrier: SettleBarrier::idle(),
        }
    }

    pub fn geometry(&self) -> &BoardGeometry {
        self.engine.generator().geometry()
    }

    pub fn phase(&self) -> TrialPhase {
        if !self.history.is_started() {
            TrialPhase::Idle
        } else if self.selection.is_some() {
            TrialPhase::Completed
        } else if self.is_finished() {
            TrialPhase::AwaitingSelection
        } else {
            TrialPhase::Running
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Board currently on screen.
    pub fn current_board(&self) -> &Board {
        self.history.latest()
    }

    /// Settings locked in by the last `start`.
    pub fn config(&self) -> &TrialConfig {
        &self.config
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Layout on screen, once a trial has started.
    pub fn layout(&self) -> Option<LayoutId> {
        self.barrier.layout()
    }

    pub fn moves_done(&self) -> u32 {
        self.history.moves_done()
    }

    pub fn is_started(&self) -> bool {
        self.history.is_started()
    }

    pub fn is_ball_visible(&self) -> bool {
        self.history.is_ball_visible()
    }

    pub fn is_finished(&self) -> bool {
        self.history.is_started() && self.history.moves_done() == self.config.move_limit
    }

    /// Begin a new trial, discarding whatever the previous one left behind.
    ///
    /// The new start layout is the last board on screen with the ball moved
    /// under a uniformly chosen shell. Signals tagged with any earlier layout
    /// are ignored from here on.
    pub fn start<R: Rng + ?Sized>(
        &mut self,
        config: TrialConfig,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<LayoutId, ConfigurationError> {
        config::check(&config, self.geometry())?;

        let shell_count = self.geometry().shell_count;
        let base = self.history.latest().clone();
        let winner = rng.gen_range(0..base.len());
        let layout = LayoutId::new(Uuid::new_v4(), 0);

        self.history = History::starting_at(base.with_ball_at(winner));
        self.config = config;
        self.selection = None;
        self.started_at = Some(now);
        self.barrier.arm(layout, shell_count);

        info!(
            trial = %layout.trial,
            move_limit = config.move_limit,
            speed_ms = config.transition_speed_ms,
            "trial started"
        );
        Ok(layout)
    }

    /// Play the next shuffle and arm the barrier for the resulting layout.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<LayoutId, TransitionError> {
        self.ensure(Operation::Shuffle)?;
        let (Some(layout), Some(next)) = (
            self.barrier.layout(),
            self.engine.shuffle(&self.history, &self.config, rng),
        ) else {
            return Err(self.not_permitted(Operation::Shuffle));
        };

        let shell_count = self.geometry().shell_count;
        self.history = next;
        let layout = layout.next();
        self.barrier.arm(layout, shell_count);

        debug!(%layout, moves_done = self.moves_done(), "layout advanced");
        if self.is_finished() {
            info!(trial = %layout.trial, "all shuffles played, awaiting selection");
        }
        Ok(layout)
    }

    /// The ball's reveal animation finished on `layout`.
    ///
    /// Starting a trial does not move any shell, so this is what plays the
    /// first shuffle. Returns the new layout when a shuffle happened.
    pub fn on_ball_reveal_settled<R: Rng + ?Sized>(
        &mut self,
        layout: LayoutId,
        rng: &mut R,
    ) -> Option<LayoutId> {
        if self.barrier.layout() != Some(layout) || !self.is_ball_visible() {
            debug!(%layout, "ignoring ball reveal signal");
            return None;
        }
        self.shuffle(rng).ok()
    }

    /// One shell finished animating into `layout`.
    ///
    /// Once every shell of the current layout has reported, the next shuffle
    /// is played. Returns the new layout when a shuffle happened.
    pub fn on_shell_animation_settled<R: Rng + ?Sized>(
        &mut self,
        layout: LayoutId,
        shell: usize,
        rng: &mut R,
    ) -> Option<LayoutId> {
        match self.barrier.settle(layout, shell) {
            SettleOutcome::Settled => match self.shuffle(rng) {
                Ok(next) => Some(next),
                Err(err) => {
                    debug!(%layout, %err, "layout settled with nothing left to play");
                    None
                }
            },
            SettleOutcome::Pending { remaining } => {
                debug!(%layout, shell, remaining, "shell settled");
                None
            }
            outcome => {
                debug!(%layout, shell, ?outcome, "ignoring settle signal");
                None
            }
        }
    }

    /// Record the participant's pick of slot `index` on the current board.
    pub fn select_shell(
        &mut self,
        index: usize,
        now: DateTime<Utc>,
    ) -> Result<CompletedTrial, TransitionError> {
        self.ensure(Operation::SelectShell)?;
        let board = self.history.latest();
        let shell = *board.get(index).ok_or(TransitionError::ShellOutOfRange {
            index,
            count: board.len(),
        })?;
        let (Some(layout), Some(started_at)) = (self.barrier.layout(), self.started_at) else {
            return Err(self.not_permitted(Operation::SelectShell));
        };

        let selection = Selection {
            index,
            shell,
            selected_at: now,
        };
        self.selection = Some(selection);

        info!(
            trial = %layout.trial,
            shell = index,
            correct = selection.is_correct(),
            "shell selected"
        );
        Ok(CompletedTrial {
            trial: layout.trial,
            config: self.config,
            selection,
            started_at,
        })
    }

    fn ensure(&self, operation: Operation) -> Result<(), TransitionError> {
        if self.phase().permits(operation) {
            Ok(())
        } else {
            Err(self.not_permitted(operation))
        }
    }

    fn not_permitted(&self, operation: Operation) -> TransitionError {
        TransitionError::NotPermitted {
            operation,
            phase: self.phase(),
        }
    }
}
