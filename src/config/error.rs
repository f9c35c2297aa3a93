//! Configuration errors.

use thiserror::Error;

/// A single broken configuration rule.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigViolation {
    #[error("move limit must be at least 1 (got {move_limit})")]
    MoveLimitTooSmall { move_limit: u32 },

    #[error("transition speed must be at least 1ms (got {speed_ms})")]
    SpeedTooSmall { speed_ms: u32 },

    #[error("at least {min} shells are required (got {count})")]
    TooFewShells { count: usize, min: usize },

    #[error("shell size must be at least 1px")]
    ShellSizeZero,

    #[error("board width {width} leaves no room for a {shell_size}px shell")]
    BoardTooNarrow { width: u32, shell_size: u32 },

    #[error("board height {height} leaves no room for a {shell_size}px shell")]
    BoardTooShort { height: u32, shell_size: u32 },

    #[error("a {width}x{height} board cannot always fit {shell_count} shells of {shell_size}px")]
    BoardTooCrowded {
        width: u32,
        height: u32,
        shell_size: u32,
        shell_count: usize,
    },
}

/// Every rule a trial configuration broke, reported together.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid trial configuration: {}", describe(.violations))]
pub struct ConfigurationError {
    pub violations: Vec<ConfigViolation>,
}

fn describe(violations: &[ConfigViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
