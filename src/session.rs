//! The game session: one participant's sequence of trials.
//!
//! [`GameSession`] is what a UI binds to. It owns the settings the controls
//! currently show, the state machine of the running trial and the trial log,
//! and turns UI events into state changes. Every handler runs to completion
//! before the next event is handled; a multi-threaded host must put the
//! whole session behind one mutex.

use crate::config::{ConfigurationError, TrialConfig};
use crate::core::{Board, BoardGeometry, Operation, TrialPhase};
use crate::machine::{TransitionError, TrialStateMachine};
use crate::settle::LayoutId;
use crate::trial_log::{EmptyLogError, ExportError, LogRecord, TrialLogger};
use chrono::{DateTime, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, instrument};

/// Any error a session operation can report.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

impl From<EmptyLogError> for SessionError {
    fn from(err: EmptyLogError) -> Self {
        Self::Export(err.into())
    }
}

/// Result shown once the participant has picked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Correct,
    Incorrect,
}

impl Outcome {
    pub fn banner(&self) -> &'static str {
        match self {
            Self::Correct => "Correct!",
            Self::Incorrect => "Wrong!",
        }
    }
}

/// Everything a renderer needs to draw the current frame.
#[derive(Clone, Debug, Serialize)]
pub struct BoardView<'a> {
    pub board: &'a Board,
    /// Tag to echo back with settle signals for this board
    pub layout: Option<LayoutId>,
    pub phase: TrialPhase,
    pub moves_done: u32,
    pub move_limit: u32,
    pub transition_speed_ms: u32,
    pub is_ball_visible: bool,
    pub is_finished: bool,
    /// The participant already picked
    pub game_ended: bool,
    pub is_clickable: bool,
    pub can_start: bool,
    pub config_locked: bool,
    pub outcome: Option<Outcome>,
    /// Slot holding the ball; only revealed once the trial is over
    pub revealed_ball: Option<usize>,
}

/// One participant's session.
pub struct GameSession<R = StdRng> {
    machine: TrialStateMachine,
    logger: TrialLogger,
    settings: TrialConfig,
    participant_name: String,
    rng: R,
}

impl GameSession<StdRng> {
    /// Session on `geometry` seeded from system entropy.
    pub fn new(geometry: BoardGeometry) -> Self {
        Self::with_rng(geometry, StdRng::from_entropy())
    }
}

impl<R: Rng> GameSession<R> {
    pub fn with_rng(geometry: BoardGeometry, rng: R) -> Self {
        Self {
            machine: TrialStateMachine::new(geometry),
            logger: TrialLogger::new(),
            settings: TrialConfig::default(),
            participant_name: String::new(),
            rng,
        }
    }

    pub fn machine(&self) -> &TrialStateMachine {
        &self.machine
    }

    pub fn logger(&self) -> &TrialLogger {
        &self.logger
    }

    /// Settings the next trial will start with.
    pub fn settings(&self) -> &TrialConfig {
        &self.settings
    }

    pub fn participant_name(&self) -> &str {
        &self.participant_name
    }

    pub fn phase(&self) -> TrialPhase {
        self.machine.phase()
    }

    pub fn start_trial(&mut self) -> Result<LayoutId, ConfigurationError> {
        self.start_trial_at(Utc::now())
    }

    /// Start a trial with the current settings, abandoning any trial in
    /// progress.
    #[instrument(skip(self), fields(phase = %self.machine.phase()))]
    pub fn start_trial_at(&mut self, now: DateTime<Utc>) -> Result<LayoutId, ConfigurationError> {
        self.machine.start(self.settings, now, &mut self.rng)
    }

    /// Choose the move limit for the next trial.
    pub fn set_difficulty(&mut self, move_limit: u32) -> Result<(), TransitionError> {
        self.ensure_configurable()?;
        self.settings.move_limit = move_limit;
        Ok(())
    }

    /// Choose the transition speed for the next trial.
    pub fn set_speed(&mut self, transition_speed_ms: u32) -> Result<(), TransitionError> {
        self.ensure_configurable()?;
        self.settings.transition_speed_ms = transition_speed_ms;
        Ok(())
    }

    pub fn set_participant_name(
        &mut self,
        name: impl Into<String>,
    ) -> Result<(), TransitionError> {
        self.ensure_configurable()?;
        self.participant_name = name.into();
        Ok(())
    }

    fn ensure_configurable(&self) -> Result<(), TransitionError> {
        let phase = self.machine.phase();
        if phase.permits(Operation::Configure) {
            Ok(())
        } else {
            debug!(%phase, "settings are locked during a trial");
            Err(TransitionError::NotPermitted {
                operation: Operation::Configure,
                phase,
            })
        }
    }

    /// The ball finished its reveal animation on `layout`.
    #[instrument(skip(self))]
    pub fn on_ball_reveal_settled(&mut self, layout: LayoutId) -> Option<LayoutId> {
        self.machine.on_ball_reveal_settled(layout, &mut self.rng)
    }

    /// Shell `shell` finished animating into `layout`.
    #[instrument(skip(self))]
    pub fn on_shell_animation_settled(
        &mut self,
        layout: LayoutId,
        shell: usize,
    ) -> Option<LayoutId> {
        self.machine
            .on_shell_animation_settled(layout, shell, &mut self.rng)
    }

    pub fn select_shell(&mut self, index: usize) -> Result<&LogRecord, TransitionError> {
        self.select_shell_at(index, Utc::now())
    }

    /// Record the participant's pick and log the trial.
    ///
    /// Picks made before the last shuffle, or after a pick was already
    /// made, change nothing and log nothing.
    #[instrument(skip(self), fields(phase = %self.machine.phase()))]
    pub fn select_shell_at(
        &mut self,
        index: usize,
        now: DateTime<Utc>,
    ) -> Result<&LogRecord, TransitionError> {
        let trial = self.machine.select_shell(index, now).inspect_err(|err| {
            debug!(%err, "selection ignored");
        })?;
        Ok(self.logger.append(&trial, &self.participant_name))
    }

    /// CSV of every logged trial.
    pub fn export(&self) -> Result<String, EmptyLogError> {
        self.logger.export()
    }

    /// Write the CSV export into `dir`, named after `date`.
    pub fn write_csv(&self, dir: &Path, date: NaiveDate) -> Result<PathBuf, ExportError> {
        self.logger.write_csv(dir, date)
    }

    pub fn view(&self) -> BoardView<'_> {
        let machine = &self.machine;
        let phase = machine.phase();
        let config = if machine.is_started() {
            *machine.config()
        } else {
            self.settings
        };
        let selection = machine.selection();
        let game_ended = selection.is_some();

        BoardView {
            board: machine.current_board(),
            layout: machine.layout(),
            phase,
            moves_done: machine.moves_done(),
            move_limit: config.move_limit,
            transition_speed_ms: config.transition_speed_ms,
            is_ball_visible: machine.is_ball_visible(),
            is_finished: machine.is_finished(),
            game_ended,
            is_clickable: machine.is_finished() && !game_ended,
            can_start: phase != TrialPhase::Running,
            config_locked: phase.is_in_trial(),
            outcome: selection.map(|s| {
                if s.is_correct() {
                    Outcome::Correct
                } else {
                    Outcome::Incorrect
                }
            }),
            revealed_ball: game_ended
                .then(|| machine.current_board().ball_index())
                .flatten(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(seed: u64) -> GameSession {
        GameSession::with_rng(BoardGeometry::default(), StdRng::seed_from_u64(seed))
    }

    fn play_out(session: &mut GameSession, start: LayoutId) {
        let mut layout = session.on_ball_reveal_settled(start);
        while let Some(current) = layout {
            layout = None;
            for shell in 0..3 {
                if let Some(next) = session.on_shell_animation_settled(current, shell) {
                    layout = Some(next);
                }
            }
        }
    }

    #[test]
    fn settings_locked_while_running() {
        let mut session = session(1);
        session.set_difficulty(5).unwrap();
        session.start_trial().unwrap();

        assert!(session.set_difficulty(9).is_err());
        assert!(session.set_speed(650).is_err());
        assert!(session.set_participant_name("late").is_err());
        assert_eq!(session.settings().move_limit, 5);
        assert_eq!(session.machine().config().move_limit, 5);
    }

    #[test]
    fn settings_unlock_after_selection() {
        let mut session = session(2);
        let start = session.start_trial().unwrap();
        play_out(&mut session, start);

        assert!(session.set_speed(350).is_err());
        session.select_shell(0).unwrap();

        session.set_speed(350).unwrap();
        assert_eq!(session.settings().transition_speed_ms, 350);
        assert_eq!(session.machine().config().transition_speed_ms, 200);
    }

    #[test]
    fn view_tracks_trial_progress() {
        let mut session = session(3);
        assert!(session.view().can_start);
        assert!(!session.view().config_locked);

        let start = session.start_trial().unwrap();
        let view = session.view();
        assert!(view.is_ball_visible);
        assert!(!view.can_start);
        assert!(view.config_locked);
        assert_eq!(view.layout, Some(start));

        play_out(&mut session, start);
        let view = session.view();
        assert!(view.is_finished);
        assert!(view.is_clickable);
        assert!(view.can_start);
        assert_eq!(view.revealed_ball, None);
    }

    #[test]
    fn selection_logs_once_and_reveals_outcome() {
        let mut session = session(4);
        session.set_participant_name("Jo").unwrap();
        let begun = Utc::now();
        let start = session.start_trial_at(begun).unwrap();
        play_out(&mut session, start);
        let ball = session.machine().current_board().ball_index().unwrap();

        let record = session
            .select_shell_at(ball, begun + Duration::milliseconds(2340))
            .unwrap()
            .clone();
        assert!(session.select_shell(ball).is_err());

        assert_eq!(session.logger().len(), 1);
        assert_eq!(record.participant_name, "Jo");
        assert_eq!(record.response_time.to_string(), "2.34");
        let view = session.view();
        assert_eq!(view.outcome, Some(Outcome::Correct));
        assert_eq!(view.revealed_ball, Some(ball));
        assert!(view.game_ended);
        assert!(!view.is_clickable);
    }

    #[test]
    fn wrong_pick_is_logged_incorrect() {
        let mut session = session(5);
        let start = session.start_trial().unwrap();
        play_out(&mut session, start);
        let ball = session.machine().current_board().ball_index().unwrap();

        let record = session.select_shell((ball + 1) % 3).unwrap();

        assert!(!record.is_correct);
        assert_eq!(session.view().outcome, Some(Outcome::Incorrect));
    }

    #[test]
    fn export_before_any_trial_is_empty() {
        let session = session(6);
        assert_eq!(session.export(), Err(EmptyLogError));
    }

    #[test]
    fn invalid_settings_fail_at_start() {
        let mut session = session(7);
        session.set_difficulty(0).unwrap();

        assert!(session.start_trial().is_err());
        assert_eq!(session.phase(), TrialPhase::Idle);
    }
}
