//! Shell game: find the ball under the shell.
//!
//! Runs a single-participant perception experiment. Three shells are shown,
//! one hides a ball, the shells are visibly shuffled a configured number of
//! times and the participant picks the shell they think hides the ball.
//! Each pick is logged with its correctness and response time, and the log
//! exports as CSV.
//!
//! This crate is the trial logic only. Rendering, form controls and file
//! download belong to the host UI, which talks to a [`GameSession`].
//!
//! # Core Concepts
//!
//! - **Board**: immutable snapshot of every shell's position
//! - **History**: append-only boards of the current trial; its length minus
//!   one is the number of shuffles played
//! - **Settle barrier**: turns per-shell "animation finished" signals into
//!   exactly one shuffle per layout
//! - **Trial log**: one record per completed trial
//!
//! # Example
//!
//! ```rust
//! use shell_game::{BoardGeometry, GameSession};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut session = GameSession::with_rng(BoardGeometry::default(), StdRng::seed_from_u64(1));
//! session.set_difficulty(3).unwrap();
//!
//! let start = session.start_trial().unwrap();
//! // The host reports animations finishing; each settled layout plays a shuffle.
//! let mut layout = session.on_ball_reveal_settled(start);
//! while let Some(current) = layout {
//!     layout = (0..3).filter_map(|shell| session.on_shell_animation_settled(current, shell)).last();
//! }
//!
//! assert!(session.view().is_clickable);
//! let record = session.select_shell(0).unwrap();
//! assert_eq!(record.move_limit, 3);
//! ```

pub mod config;
pub mod core;
pub mod machine;
pub mod position;
pub mod session;
pub mod settle;
pub mod shuffle;
pub mod trial_log;

// Re-export commonly used types
pub use config::{ConfigurationError, TrialConfig};
pub use crate::core::{Board, BoardGeometry, History, Shell, TrialPhase};
pub use machine::{TransitionError, TrialStateMachine};
pub use session::{BoardView, GameSession, Outcome, SessionError};
pub use settle::LayoutId;
pub use trial_log::{EmptyLogError, LogRecord, TrialLogger};
