//! Phases of a trial and the operations each phase accepts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the current trial is in its lifecycle.
///
/// ```text
/// Idle -> Running -> AwaitingSelection -> Completed
///   ^________|______________|_______________|   (start_trial)
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrialPhase {
    /// No trial has been started yet
    Idle,
    /// Shuffles are still being played out
    Running,
    /// Every shuffle is done; waiting for the participant's pick
    AwaitingSelection,
    /// The participant picked a shell
    Completed,
}

/// UI-initiated operations checked against the current phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    StartTrial,
    Shuffle,
    SelectShell,
    Configure,
}

impl TrialPhase {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Running => "Running",
            Self::AwaitingSelection => "AwaitingSelection",
            Self::Completed => "Completed",
        }
    }

    /// A completed trial accepts nothing but a restart or new settings.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Whether the settings controls are locked.
    pub fn is_in_trial(&self) -> bool {
        matches!(self, Self::Running | Self::AwaitingSelection)
    }

    /// Check if `operation` may run in this phase (pure).
    pub fn permits(&self, operation: Operation) -> bool {
        match operation {
            Operation::StartTrial => true,
            Operation::Shuffle => matches!(self, Self::Running),
            Operation::SelectShell => matches!(self, Self::AwaitingSelection),
            Operation::Configure => !self.is_in_trial(),
        }
    }
}

impl fmt::Display for TrialPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::StartTrial => "start_trial",
            Self::Shuffle => "shuffle",
            Self::SelectShell => "select_shell",
            Self::Configure => "configure",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [TrialPhase; 4] = [
        TrialPhase::Idle,
        TrialPhase::Running,
        TrialPhase::AwaitingSelection,
        TrialPhase::Completed,
    ];

    #[test]
    fn start_is_permitted_everywhere() {
        for phase in ALL {
            assert!(phase.permits(Operation::StartTrial), "{phase}");
        }
    }

    #[test]
    fn selection_only_while_awaiting() {
        assert!(!TrialPhase::Idle.permits(Operation::SelectShell));
        assert!(!TrialPhase::Running.permits(Operation::SelectShell));
        assert!(TrialPhase::AwaitingSelection.permits(Operation::SelectShell));
        assert!(!TrialPhase::Completed.permits(Operation::SelectShell));
    }

    #[test]
    fn configuration_locked_during_trial() {
        assert!(TrialPhase::Idle.permits(Operation::Configure));
        assert!(!TrialPhase::Running.permits(Operation::Configure));
        assert!(!TrialPhase::AwaitingSelection.permits(Operation::Configure));
        assert!(TrialPhase::Completed.permits(Operation::Configure));
    }

    #[test]
    fn only_running_shuffles() {
        let shuffling: Vec<_> = ALL
            .into_iter()
            .filter(|p| p.permits(Operation::Shuffle))
            .collect();
        assert_eq!(shuffling, vec![TrialPhase::Running]);
    }

    #[test]
    fn is_final_identifies_completed() {
        assert!(TrialPhase::Completed.is_final());
        assert!(!TrialPhase::AwaitingSelection.is_final());
    }

    #[test]
    fn phase_serializes_by_name() {
        let json = serde_json::to_string(&TrialPhase::AwaitingSelection).unwrap();
        assert_eq!(json, "\"AwaitingSelection\"");
    }
}
