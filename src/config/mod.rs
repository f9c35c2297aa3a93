//! Trial settings and the rules they must satisfy.
//!
//! A [`TrialConfig`] is what the participant-facing controls select: how
//! many shuffles to play and how long each animated re-layout takes. The
//! state machine copies it when a trial starts, so later edits only affect
//! the next trial.
//!
//! # Example
//!
//! ```rust
//! use shell_game::config::{self, SpeedPreset, TrialConfig};
//! use shell_game::core::BoardGeometry;
//!
//! let config = TrialConfig::new(5, SpeedPreset::Normal.millis());
//! assert!(config::check(&config, &BoardGeometry::default()).is_ok());
//! ```

pub mod error;
pub mod rules;

pub use error::{ConfigViolation, ConfigurationError};
pub use rules::{check, fits_every_shell, validate, MIN_SHELL_COUNT};

use serde::{Deserialize, Serialize};

/// Move limits offered by the difficulty control.
pub const MOVE_LIMIT_PRESETS: [u32; 4] = [3, 5, 7, 9];

/// Default number of shuffles per trial.
pub const DEFAULT_MOVE_LIMIT: u32 = 3;

/// Transition speeds offered by the speed control.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpeedPreset {
    VeryFast,
    Fast,
    Normal,
    Slow,
}

impl SpeedPreset {
    pub const ALL: [SpeedPreset; 4] = [Self::VeryFast, Self::Fast, Self::Normal, Self::Slow];

    pub fn millis(&self) -> u32 {
        match self {
            Self::VeryFast => 200,
            Self::Fast => 350,
            Self::Normal => 500,
            Self::Slow => 650,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::VeryFast => "Very fast (200ms)",
            Self::Fast => "Fast (350ms)",
            Self::Normal => "Normal (500ms)",
            Self::Slow => "Slow (650ms)",
        }
    }

    /// Preset matching `millis`, if any.
    pub fn from_millis(millis: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|preset| preset.millis() == millis)
    }
}

/// Settings a trial runs with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrialConfig {
    /// Shuffles to play before the participant may pick
    pub move_limit: u32,
    /// Duration of one animated re-layout
    pub transition_speed_ms: u32,
}

impl TrialConfig {
    pub fn new(move_limit: u32, transition_speed_ms: u32) -> Self {
        Self {
            move_limit,
            transition_speed_ms,
        }
    }
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            move_limit: DEFAULT_MOVE_LIMIT,
            transition_speed_ms: SpeedPreset::VeryFast.millis(),
        }
    }
}
