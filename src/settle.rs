//! Settle barrier between the animation host and trial progress.
//!
//! Every shell animates to each new layout at once, and the host reports one
//! "settled" signal per shell. The barrier turns those signals into exactly
//! one "layout settled" event per layout: each signal names the layout it
//! belongs to and the shell it came from, so signals from an abandoned
//! trial, from an older layout, or repeated for the same shell are ignored
//! instead of being counted.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifies one rendered layout of one trial.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayoutId {
    /// Trial the layout belongs to
    pub trial: Uuid,
    /// 0 for the starting layout, then one per shuffle
    pub generation: u32,
}

impl LayoutId {
    pub fn new(trial: Uuid, generation: u32) -> Self {
        Self { trial, generation }
    }

    /// Id of the layout that follows this one.
    pub fn next(&self) -> Self {
        Self {
            trial: self.trial,
            generation: self.generation + 1,
        }
    }
}

impl fmt::Display for LayoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.trial, self.generation)
    }
}

/// What a single settle signal did to the barrier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettleOutcome {
    /// Signal belongs to a layout that is no longer on screen
    Stale,
    /// Shell index is not on the board
    UnknownShell,
    /// This shell already reported for this layout
    Duplicate,
    /// Counted; still waiting on `remaining` shells
    Pending { remaining: usize },
    /// Last shell of the layout reported; fires once per layout
    Settled,
}

/// Counts down the per-shell settle signals of the layout on screen.
#[derive(Clone, Debug, Default)]
pub struct SettleBarrier {
    layout: Option<LayoutId>,
    settled: Vec<bool>,
    remaining: usize,
}

impl SettleBarrier {
    /// Barrier that is not waiting on any layout.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Start waiting for `shell_count` signals tagged with `layout`.
    pub fn arm(&mut self, layout: LayoutId, shell_count: usize) {
        self.layout = Some(layout);
        self.settled = vec![false; shell_count];
        self.remaining = shell_count;
    }

    /// Layout this barrier is waiting on.
    pub fn layout(&self) -> Option<LayoutId> {
        self.layout
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Register that `shell` finished animating into `layout`.
    pub fn settle(&mut self, layout: LayoutId, shell: usize) -> SettleOutcome {
        if self.layout != Some(layout) {
            return SettleOutcome::Stale;
        }
        let Some(seen) = self.settled.get_mut(shell) else {
            return SettleOutcome::UnknownShell;
        };
        if *seen {
            return SettleOutcome::Duplicate;
        }

        *seen = true;
        self.remaining -= 1;
        if self.remaining == 0 {
            SettleOutcome::Settled
        } else {
            SettleOutcome::Pending {
                remaining: self.remaining,
            }
        }
    }
}
