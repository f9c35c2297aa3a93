//! Validation rules for trial settings.
//!
//! Rules are checked with `Validation` so that a bad configuration reports
//! every broken rule at once instead of the first one found.

use crate::config::error::{ConfigViolation, ConfigurationError};
use crate::config::TrialConfig;
use crate::core::BoardGeometry;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Fewest shells a trial can be played with.
pub const MIN_SHELL_COUNT: usize = 2;

type Check = Validation<(), NonEmptyVec<ConfigViolation>>;

fn rule(holds: bool, violation: impl FnOnce() -> ConfigViolation) -> Check {
    if holds {
        Validation::success(())
    } else {
        Validation::fail(violation())
    }
}

/// Run every rule, accumulating ALL violations.
pub fn validate(config: &TrialConfig, geometry: &BoardGeometry) -> Check {
    let checks = vec![
        rule(config.move_limit >= 1, || ConfigViolation::MoveLimitTooSmall {
            move_limit: config.move_limit,
        }),
        rule(config.transition_speed_ms >= 1, || {
            ConfigViolation::SpeedTooSmall {
                speed_ms: config.transition_speed_ms,
            }
        }),
        rule(geometry.shell_count >= MIN_SHELL_COUNT, || {
            ConfigViolation::TooFewShells {
                count: geometry.shell_count,
                min: MIN_SHELL_COUNT,
            }
        }),
        rule(geometry.shell_size >= 1, || ConfigViolation::ShellSizeZero),
        rule(geometry.width > geometry.shell_size, || {
            ConfigViolation::BoardTooNarrow {
                width: geometry.width,
                shell_size: geometry.shell_size,
            }
        }),
        rule(geometry.height > geometry.shell_size, || {
            ConfigViolation::BoardTooShort {
                height: geometry.height,
                shell_size: geometry.shell_size,
            }
        }),
        rule(!has_room_to_place(geometry) || fits_every_shell(geometry), || {
            ConfigViolation::BoardTooCrowded {
                width: geometry.width,
                height: geometry.height,
                shell_size: geometry.shell_size,
                shell_count: geometry.shell_count,
            }
        }),
    ];

    Validation::all_vec(checks).map(|_| ())
}

/// Board and shell count are sane enough for the capacity rule to apply.
fn has_room_to_place(geometry: &BoardGeometry) -> bool {
    geometry.shell_count >= MIN_SHELL_COUNT
        && geometry.width > geometry.shell_size
        && geometry.height > geometry.shell_size
}

/// Whether random placement always has a free spot for the next shell.
///
/// Each placed shell blocks `2 * shell_size + 1` positions along an axis.
/// If the positions along either axis outnumber what `shell_count - 1`
/// shells can block, some spot stays open and placement terminates.
pub fn fits_every_shell(geometry: &BoardGeometry) -> bool {
    let size = u64::from(geometry.shell_size);
    let blocked = (geometry.shell_count as u64).saturating_sub(1) * (2 * size + 1);
    let span = |extent: u32| u64::from(extent).saturating_sub(size);

    span(geometry.width) > blocked || span(geometry.height) > blocked
}

/// [`validate`], folded into a `Result` for `?`.
pub fn check(config: &TrialConfig, geometry: &BoardGeometry) -> Result<(), ConfigurationError> {
    match validate(config, geometry) {
        Validation::Success(_) => Ok(()),
        Validation::Failure(errors) => Err(ConfigurationError {
            violations: errors.iter().cloned().collect(),
        }),
    }
}
