//! Run/pause control state machine.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// The two states of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunState {
    #[default]
    Paused,
    Running,
}

/// What a single tick did (or decided not to do).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TickOutcome {
    /// Paused: no step was computed and the step index did not advance.
    Halt,
    /// A step was computed and recorded.
    Continue,
    /// Every row is written; terminal until the session is re-initialized.
    Complete,
}

/// Gates the update rule on start/pause signals.
///
/// Owned by a session and rebuilt with it; there is no shared run flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunController {
    state: RunState,
}

impl RunController {
    /// Creates a controller in the `Paused` state.
    pub fn new() -> Self {
        Self::default()
    }

    /// `Paused -> Running`; idempotent when already running.
    ///
    /// Returns true if the state changed.
    pub fn on_start(&mut self) -> bool {
        self.transition(RunState::Running)
    }

    /// `Running -> Paused`; idempotent when already paused.
    ///
    /// Returns true if the state changed.
    pub fn on_pause(&mut self) -> bool {
        self.transition(RunState::Paused)
    }

    fn transition(&mut self, next: RunState) -> bool {
        if self.state == next {
            return false;
        }
        debug!(from = ?self.state, to = ?next, "run state change");
        self.state = next;
        true
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    /// Decides what tick `step` should do in a run of `step_count` steps.
    ///
    /// Completion wins over pause: once `step >= step_count` the run is over
    /// whatever the state. `Continue` means the caller must compute and record
    /// exactly one step.
    pub fn gate(&self, step: usize, step_count: usize) -> TickOutcome {
        if step >= step_count {
            TickOutcome::Complete
        } else if self.is_running() {
            TickOutcome::Continue
        } else {
            TickOutcome::Halt
        }
    }
}
